mod doc;
mod provenance;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use doc::{CenteringDoc, MeshDoc};
use meshcalc::prelude::*;
use provenance::{current_git_rev, write_sidecar, Payload};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

#[derive(Parser)]
#[command(name = "meshcalc")]
#[command(about = "Probe and combine datasets on unstructured 2D meshes")]
struct Cmd {
    /// How sentinel node values enter interpolation
    #[arg(long, value_enum, default_value_t = Policy::PassThrough)]
    nodata: Policy,

    #[command(subcommand)]
    action: Action,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Policy {
    PassThrough,
    Propagate,
}

impl From<Policy> for NoDataPolicy {
    fn from(p: Policy) -> Self {
        match p {
            Policy::PassThrough => NoDataPolicy::PassThrough,
            Policy::Propagate => NoDataPolicy::Propagate,
        }
    }
}

#[derive(Subcommand)]
enum Action {
    /// Print the interpolated value of one output at a point
    Probe(ProbeArgs),
    /// Derive a dataset with one operator and attach it to the mesh
    Calc(CalcArgs),
    /// Print version, provenance, and the operator table
    Report,
}

#[derive(Args)]
struct ProbeArgs {
    #[arg(long)]
    mesh: PathBuf,
    #[arg(long)]
    dataset: String,
    #[arg(long, default_value_t = 0)]
    step: usize,
    #[arg(long, allow_hyphen_values = true)]
    x: f64,
    #[arg(long, allow_hyphen_values = true)]
    y: f64,
}

#[derive(Args)]
struct CalcArgs {
    #[arg(long)]
    mesh: PathBuf,
    /// Operator name, e.g. `add`, `abs`, `max_aggr`, `number`, `copy`
    #[arg(long)]
    op: String,
    #[arg(long)]
    a: Option<String>,
    #[arg(long)]
    b: Option<String>,
    /// Constant for `number`
    #[arg(long, allow_hyphen_values = true)]
    value: Option<f64>,
    /// Name for the derived dataset (defaults to the operator expression)
    #[arg(long)]
    name: Option<String>,
    /// Write the mesh with the new dataset here
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> Result<()> {
    SubscriberBuilder::default()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Probe(args) => probe(args, cmd.nodata),
        Action::Calc(args) => calc(args, cmd.nodata),
        Action::Report => report(),
    }
}

fn load_mesh(path: &Path, policy: Policy) -> Result<Mesh> {
    let mut mesh = MeshDoc::load(path)?
        .into_mesh()
        .with_context(|| format!("building mesh from {}", path.display()))?;
    mesh.set_interp_cfg(InterpCfg {
        nodata: policy.into(),
    });
    tracing::info!(
        path = %path.display(),
        nodes = mesh.node_count(),
        elements = mesh.element_count(),
        datasets = mesh.datasets().len(),
        "loaded mesh"
    );
    Ok(mesh)
}

fn probe(args: ProbeArgs, policy: Policy) -> Result<()> {
    let mesh = load_mesh(&args.mesh, policy)?;
    let ds = mesh
        .dataset(&args.dataset)
        .with_context(|| format!("no dataset `{}`", args.dataset))?;
    let o = ds.output(args.step).with_context(|| {
        format!(
            "dataset `{}` has {} outputs, asked for step {}",
            args.dataset,
            ds.output_count(),
            args.step
        )
    })?;
    let p = Vec2::new(args.x, args.y);
    let value = mesh.value_at(o, p);
    let vector = o
        .is_vector()
        .then(|| mesh.vector_value_at(o, p))
        .filter(|v| *v != NODATA_VEC)
        .map(|v| [v.x, v.y]);
    tracing::info!(dataset = %args.dataset, step = args.step, x = args.x, y = args.y, "probe");
    let out = json!({
        "dataset": args.dataset,
        "step": args.step,
        "time": o.time(),
        "x": args.x,
        "y": args.y,
        "value": (!is_nodata(value)).then_some(value),
        "vector": vector,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn operand<'m>(calc: &DatasetCalc<'m>, op: &str, name: Option<&str>, flag: &str) -> Result<&'m Dataset> {
    let name = name.with_context(|| format!("operator `{op}` needs --{flag}"))?;
    calc.dataset(name)
        .with_context(|| format!("no dataset `{name}`"))
}

/// Run one operator over datasets `a` (and `b`) of `mesh`.
fn apply_op(
    mesh: &Mesh,
    op: &str,
    a: Option<&str>,
    b: Option<&str>,
    value: Option<f64>,
) -> Result<Dataset> {
    let used: Vec<&str> = a.into_iter().chain(b).collect();
    let calc = DatasetCalc::new(mesh, &used);
    calc.status()?;
    let ds = match op {
        "number" => calc.number(value.context("operator `number` needs --value")?)?,
        "ones" => calc.ones()?,
        "nodata" => calc.nodata()?,
        "copy" => calc.copy(operand(&calc, op, a, "a")?.name())?,
        _ => {
            if let Ok(u) = op.parse::<UnaryOp>() {
                calc.unary(operand(&calc, op, a, "a")?, u)?
            } else if let Ok(f) = op.parse::<BinaryOp>() {
                let lhs = operand(&calc, op, a, "a")?;
                let rhs = operand(&calc, op, b, "b")?;
                calc.binary(lhs, rhs, f)?
            } else {
                let g: AggrOp = op.parse()?;
                calc.aggregate(operand(&calc, op, a, "a")?, g)?
            }
        }
    };
    Ok(ds)
}

fn summary(ds: &Dataset) -> Value {
    let (mut lo, mut hi, mut nodata) = (f64::INFINITY, f64::NEG_INFINITY, 0usize);
    for v in ds.outputs().iter().flat_map(|o| o.values().iter().copied()) {
        if is_nodata(v) {
            nodata += 1;
        } else {
            lo = lo.min(v);
            hi = hi.max(v);
        }
    }
    json!({
        "name": ds.name(),
        "centering": ds.centering().map(CenteringDoc::from),
        "time_varying": ds.is_time_varying(),
        "steps": ds.output_count(),
        "times": ds.times(),
        "min": lo.is_finite().then_some(lo),
        "max": hi.is_finite().then_some(hi),
        "nodata": nodata,
    })
}

fn calc(args: CalcArgs, policy: Policy) -> Result<()> {
    let mut mesh = load_mesh(&args.mesh, policy)?;
    let mut result = apply_op(
        &mesh,
        &args.op,
        args.a.as_deref(),
        args.b.as_deref(),
        args.value,
    )?;
    if let Some(name) = &args.name {
        result.set_name(name.as_str());
    }
    let brief = summary(&result);
    tracing::info!(op = %args.op, name = result.name(), steps = result.output_count(), "calc");
    mesh.add_dataset(result)?;

    if let Some(out) = &args.out {
        MeshDoc::from_mesh(&mesh).save(out)?;
        let payload = Payload::new(json!({
            "op": args.op,
            "a": args.a,
            "b": args.b,
            "value": args.value,
            "name": args.name,
            "nodata": format!("{policy:?}"),
        }))
        .with_input(&args.mesh);
        let sidecar = write_sidecar(out, payload)?;
        tracing::info!(out = %out.display(), provenance = %sidecar.display(), "wrote mesh");
    }
    println!("{}", serde_json::to_string_pretty(&brief)?);
    Ok(())
}

fn report() -> Result<()> {
    let obj = json!({
        "meshcalc": meshcalc::VERSION,
        "code_rev": current_git_rev(),
        "operators": {
            "constant": ["number", "ones", "nodata", "copy"],
            "unary": UnaryOp::ALL.map(UnaryOp::name),
            "binary": BinaryOp::ALL.map(BinaryOp::name),
            "aggregate": AggrOp::ALL.map(AggrOp::name),
        }
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
