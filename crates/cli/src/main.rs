mod provenance;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use ellipse::{ConstructionPlan, Engine, Method, MethodKind, StepSequencer};
use serde_json::Value;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing_subscriber::fmt::SubscriberBuilder;

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Ellipse construction draw plans and step playback")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Write the draw plan for one step (or everything) as JSON
    Plan {
        #[arg(long)]
        method: MethodKind,
        /// Step index (0-based); ignored with --all
        #[arg(long, default_value_t = 0)]
        step: usize,
        /// Draw every feature regardless of step
        #[arg(long)]
        all: bool,
        /// JSON file overriding the method's parameters
        #[arg(long)]
        params: Option<String>,
        #[arg(long)]
        out: String,
    },
    /// Print the numbered construction steps
    Steps {
        #[arg(long)]
        method: MethodKind,
        #[arg(long)]
        params: Option<String>,
    },
    /// Auto-play the steps in real time, logging each revealed step
    Animate {
        #[arg(long)]
        method: MethodKind,
        #[arg(long)]
        params: Option<String>,
        /// Seconds between steps
        #[arg(long, default_value_t = ellipse::cfg::DEFAULT_TICK_INTERVAL)]
        interval: f64,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Plan {
            method,
            step,
            all,
            params,
            out,
        } => plan(method, params.as_deref(), step, all, out),
        Action::Steps { method, params } => steps(method, params.as_deref()),
        Action::Animate {
            method,
            params,
            interval,
        } => animate(method, params.as_deref(), interval),
        Action::Report => report(),
    }
}

/// Method parameters: defaults, or the JSON object in `params` tagged with `kind`.
fn load_method(kind: MethodKind, params: Option<&str>) -> Result<Method> {
    let Some(path) = params else {
        return Ok(Method::defaults(kind));
    };
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    let mut value: Value =
        serde_json::from_str(&text).with_context(|| format!("parsing {path}"))?;
    let Some(obj) = value.as_object_mut() else {
        bail!("{path}: expected a JSON object of parameters");
    };
    obj.insert("method".into(), Value::from(kind.as_str()));
    serde_json::from_value(value).with_context(|| format!("{path}: invalid {kind} parameters"))
}

fn load_plan(kind: MethodKind, params: Option<&str>) -> Result<ConstructionPlan> {
    let method = load_method(kind, params)?;
    ConstructionPlan::new(method).with_context(|| format!("invalid {kind} parameters"))
}

fn plan(
    kind: MethodKind,
    params: Option<&str>,
    step: usize,
    all: bool,
    out: String,
) -> Result<()> {
    let plan = load_plan(kind, params)?;
    if !all && step >= plan.step_count() {
        bail!(
            "step {step} out of range: {kind} has {} steps",
            plan.step_count()
        );
    }
    let engine = Engine::default();
    let draw = engine.draw_plan(&plan, step, all);
    tracing::info!(
        method = %kind,
        step,
        all,
        ops = draw.len(),
        curve = draw.has_closed_curve(),
        out,
        "plan"
    );

    let out_path = Path::new(&out);
    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(out_path, serde_json::to_vec_pretty(&draw)?)
        .with_context(|| format!("writing {out}"))?;

    let payload = provenance::Payload::new(kind, serde_json::to_value(plan.method())?)
        .with_view(step, all);
    provenance::write_sidecar(out_path, payload)?;
    Ok(())
}

fn steps(kind: MethodKind, params: Option<&str>) -> Result<()> {
    let plan = load_plan(kind, params)?;
    println!("{}", plan.title());
    for s in plan.steps() {
        println!("Step {}: {}", s.index + 1, s.label);
    }
    Ok(())
}

fn animate(kind: MethodKind, params: Option<&str>, interval: f64) -> Result<()> {
    if !(interval.is_finite() && interval > 0.0) {
        bail!("interval must be a positive number of seconds, got {interval}");
    }
    let plan = load_plan(kind, params)?;
    let engine = Engine::default();
    let mut seq = StepSequencer::with_interval(plan.step_count(), interval);
    seq.enable_stepping();
    seq.play();

    let mut shown = None;
    let mut last = Instant::now();
    loop {
        let step = seq.current_step();
        if shown != Some(step) {
            let draw = engine.draw_plan_for(&plan, &seq);
            let label = plan.steps().get(step).map(|s| s.label.as_str());
            tracing::info!(step = step + 1, ops = draw.len(), label, "step");
            shown = Some(step);
        }
        if !seq.is_playing() {
            break;
        }
        std::thread::sleep(Duration::from_millis(50));
        let now = Instant::now();
        seq.advance((now - last).as_secs_f64());
        last = now;
    }
    tracing::info!(method = %kind, state = ?seq.state(), "animation finished");
    Ok(())
}

fn report() -> Result<()> {
    let obj = provenance::block(None, Value::Object(Default::default()), Vec::new());
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
