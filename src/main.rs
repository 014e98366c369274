use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod audit;
mod cli;
mod context;
mod creator;
mod error;
mod github;
mod inspector;
mod lister;
mod manifest;
mod model;
mod replay;
mod report;
mod util;

use crate::audit::AuditOptions;
use crate::cli::{normalize, Cli, Mode};
use crate::context::RunContext;
use crate::error::FatalError;

fn setup_logging(verbose: u8) {
  let default = match verbose {
    0 => "info",
    1 => "debug",
    _ => "trace",
  };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

  let _ = tracing_subscriber::registry()
    .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
    .with(filter)
    .try_init();
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  if cli.gen_man {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(());
  }

  setup_logging(cli.verbose);

  // Phase 1: normalize CLI (target selection, credential, now)
  let cfg = normalize(cli)?;

  if let Mode::Replay { csv } = &cfg.mode {
    if !csv.is_file() {
      return Err(FatalError::MissingInput(csv.clone()).into());
    }
  }

  // Phase 2: connect and establish identity
  let api = github::build_api(&cfg.api_url, cfg.token.clone())?;
  let ctx = RunContext::establish(api.as_ref())?;

  // Phase 3: dispatch
  match &cfg.mode {
    Mode::Replay { csv } => {
      let tally = replay::apply_from_csv(api.as_ref(), &ctx, csv, cfg.dry_run)?;
      println!("{}", report::replay_summary(&tally));
    }
    Mode::Single { owner, kind, repo } => {
      let opts = audit_options(&cfg, owner, *kind);
      let outcome = audit::audit_single(api.as_ref(), &ctx, repo, &opts)?;
      println!("{}", report::single_summary(&outcome));
    }
    Mode::Scan { owner, kind } => {
      let opts = audit_options(&cfg, owner, *kind);
      let manifest = audit::run_audit(api.as_ref(), &ctx, &opts);

      util::ensure_out_dir(&cfg.output_dir)?;
      let stamp = util::effective_now(cfg.now_override);
      let paths = manifest::write_manifest(&manifest, &cfg.output_dir, stamp)?;
      println!("{}", report::audit_summary(&ctx, &manifest, &paths));
    }
  }

  Ok(())
}

fn audit_options(cfg: &cli::EffectiveConfig, owner: &str, kind: model::OwnerKind) -> AuditOptions {
  AuditOptions {
    owner: owner.to_string(),
    kind,
    visibility: cfg.visibility,
    apply: cfg.apply,
    dry_run: cfg.dry_run,
    now_override: cfg.now_override,
  }
}
