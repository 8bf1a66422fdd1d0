//! Command handlers

use std::path::{Path, PathBuf};

use tracing::{debug, info};
use uuid::Uuid;

use crate::cli::{Cli, Commands};
use crate::output::{
    output_catalog, output_invoice, output_jsa, output_outbox, output_status, output_style,
    output_submission_queued,
};
use fieldbill_app::app::{build_submission, load_app_state, load_script, run_script, submit, update_app_state};
use fieldbill_app::config::Config;
use fieldbill_app::export::export_invoice_to_excel;
use fieldbill_app::repository::{open_app_state_store, open_outbox};
use fieldbill_domain::model::{CatalogItem, JsaForm, PricingPlan, Theme};
use fieldbill_domain::repository::SubmissionOutbox;
use fieldbill_domain::service::{compute_style, LastRowPolicy, StyleVariant};
use fieldbill_infra::catalog_csv::load_catalog_from_csv;
use fieldbill_infra::pricing_plan_loader::load_pricing_plan;
use fieldbill_types::{Error, OutputFormat, Result};

pub fn execute(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let format = cli.format.unwrap_or(config.output_format);
    debug!(%format, "configuration loaded");

    match cli.command {
        Commands::Invoice {
            script,
            plan,
            catalog,
            last_row,
            export,
            submit,
        } => cmd_invoice(
            &config,
            format,
            InvoiceArgs {
                script,
                plan,
                catalog,
                last_row,
                export,
                submit,
            },
        ),
        Commands::Outbox { remove } => cmd_outbox(&config, format, remove),
        Commands::Catalog { file } => cmd_catalog(format, &file),
        Commands::Jsa { form } => cmd_jsa(format, &form),
        Commands::Theme { set, toggle } => cmd_theme(&config, format, set, toggle),
        Commands::Style { variant, theme } => cmd_style(&config, format, variant, theme),
        Commands::Login { email } => cmd_login(&config, format, email),
        Commands::Logout => cmd_logout(&config, format),
        Commands::Status => {
            let store = open_app_state_store(&config)?;
            output_status(format, &load_app_state(&store)?)
        }
        Commands::Config {
            show,
            set_output,
            set_last_row,
            set_plan,
            set_data_dir,
            reset,
        } => cmd_config(
            config,
            show,
            set_output,
            set_last_row,
            set_plan,
            set_data_dir,
            reset,
        ),
    }
}

struct InvoiceArgs {
    script: PathBuf,
    plan: Option<PathBuf>,
    catalog: Option<PathBuf>,
    last_row: Option<LastRowPolicy>,
    export: Option<PathBuf>,
    submit: bool,
}

fn cmd_invoice(config: &Config, format: OutputFormat, args: InvoiceArgs) -> Result<()> {
    let script = load_script(&args.script)?;

    let plan_path = args.plan.or_else(|| config.pricing_plan.clone());
    let plan: Option<PricingPlan> = match plan_path {
        Some(path) => Some(load_pricing_plan(&path)?),
        None => None,
    };
    let extra_catalog: Vec<CatalogItem> = match args.catalog {
        Some(path) => load_catalog_from_csv(&path)?,
        None => Vec::new(),
    };
    let policy = args.last_row.unwrap_or(config.last_row_policy);

    let run = run_script(&script, policy, plan.as_ref(), &extra_catalog);
    output_invoice(format, &run)?;

    if args.export.is_none() && !args.submit {
        return Ok(());
    }

    let submission = build_submission(run.header, &run.ledger)?;
    if let Some(path) = args.export {
        export_invoice_to_excel(&submission, &path)?;
        if format == OutputFormat::Table {
            println!("\nExported to {}", path.display());
        }
    }
    if args.submit {
        let outbox = open_outbox(config)?;
        submit(&outbox, &submission)?;
        output_submission_queued(format, &submission)?;
    }
    Ok(())
}

fn cmd_outbox(config: &Config, format: OutputFormat, remove: Option<String>) -> Result<()> {
    let outbox = open_outbox(config)?;
    if let Some(id) = remove {
        let id = parse_submission_id(&id)?;
        if !outbox.remove(id)? {
            return Err(Error::NotFound(format!("submission {}", id)));
        }
        info!(%id, "submission removed");
    }
    output_outbox(format, outbox.dir(), &outbox.pending()?)
}

fn cmd_catalog(format: OutputFormat, file: &Path) -> Result<()> {
    let is_toml = file
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("toml"));
    let items = if is_toml {
        load_pricing_plan(file)?.items
    } else {
        load_catalog_from_csv(file)?
    };
    output_catalog(format, &items)
}

fn cmd_jsa(format: OutputFormat, path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(path)?;
    let form: JsaForm = serde_json::from_str(&content)?;
    output_jsa(format, &form)
}

fn cmd_theme(config: &Config, format: OutputFormat, set: Option<Theme>, toggle: bool) -> Result<()> {
    let store = open_app_state_store(config)?;
    let state = if let Some(theme) = set {
        update_app_state(&store, |s| s.theme = theme)?
    } else if toggle {
        update_app_state(&store, |s| {
            s.toggle_theme();
        })?
    } else {
        load_app_state(&store)?
    };
    output_status(format, &state)
}

fn cmd_style(
    config: &Config,
    format: OutputFormat,
    variant: StyleVariant,
    theme: Option<Theme>,
) -> Result<()> {
    let theme = match theme {
        Some(theme) => theme,
        None => load_app_state(&open_app_state_store(config)?)?.theme,
    };
    let style = compute_style(theme, variant);
    output_style(format, variant, &style)
}

fn cmd_login(config: &Config, format: OutputFormat, email: String) -> Result<()> {
    if !email.contains('@') {
        return Err(Error::Validation(format!("not an email address: {}", email)));
    }
    let store = open_app_state_store(config)?;
    let state = update_app_state(&store, |s| s.sign_in(email))?;
    output_status(format, &state)
}

fn cmd_logout(config: &Config, format: OutputFormat) -> Result<()> {
    let store = open_app_state_store(config)?;
    let state = update_app_state(&store, |s| s.sign_out())?;
    output_status(format, &state)
}

fn cmd_config(
    mut config: Config,
    show: bool,
    set_output: Option<OutputFormat>,
    set_last_row: Option<LastRowPolicy>,
    set_plan: Option<PathBuf>,
    set_data_dir: Option<PathBuf>,
    reset: bool,
) -> Result<()> {
    if reset {
        config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults.");
        return Ok(());
    }

    let mut modified = false;

    if let Some(output) = set_output {
        config.output_format = output;
        modified = true;
        println!("Output format set to: {}", output);
    }

    if let Some(policy) = set_last_row {
        config.last_row_policy = policy;
        modified = true;
        println!("Last-row policy set to: {}", policy);
    }

    if let Some(plan) = set_plan {
        println!("Pricing plan set to: {}", plan.display());
        config.pricing_plan = Some(plan);
        modified = true;
    }

    if let Some(dir) = set_data_dir {
        println!("Data directory set to: {}", dir.display());
        config.data_dir = Some(dir);
        modified = true;
    }

    if modified {
        config.save()?;
        println!("Configuration saved.");
    }

    if show || !modified {
        println!("{}", config);
    }

    Ok(())
}

fn parse_submission_id(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s.trim())
        .map_err(|e| Error::Validation(format!("invalid submission id {}: {}", s, e)))
}
