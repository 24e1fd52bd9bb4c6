use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use domy_core::{
    default_config_root, resolve_catalog, resolve_version, UserConfig, UserConfigStore,
};
use domy_installer::{
    remove, scatter_with_report, ProjectLayout, RemoveReport, RemoveRequest, ScatterReport,
    ScatterRequest,
};
use domy_publisher::{
    gather, plan, CommandBuilder, GatherPlan, GatherReport, GatherRequest, ProjectBuilder,
};
use domy_registry::{
    login, signup, HttpRegistry, RegistryClient, RegistryPath, DEFAULT_REGISTRY_URL,
};

mod completion;
mod dispatch;
mod render;

use completion::write_completions_script;
use dispatch::run_cli;
use render::{
    format_gather_lines, format_plan_lines, format_remove_lines, format_scatter_lines,
    TerminalRenderer,
};

#[derive(Parser, Debug)]
#[command(name = "domy")]
#[command(about = "Publish and install web components through a domy registry", long_about = None)]
#[command(disable_version_flag = true)]
struct Cli {
    /// Registry base URL.
    #[arg(long, global = true, env = "DOMY_REGISTRY", default_value = DEFAULT_REGISTRY_URL)]
    registry: String,
    /// Raise log verbosity (-v info, -vv debug).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Push built components to the registry.
    #[command(visible_alias = "p")]
    Publish {
        component: Option<String>,
        #[arg(short, long)]
        catalog: Option<String>,
        #[arg(short, long, visible_alias = "version")]
        release: Option<String>,
        /// Run the project build first.
        #[arg(long)]
        build: bool,
        /// Show what would be uploaded without contacting the registry.
        #[arg(long)]
        dry_run: bool,
    },
    /// Pull pinned components into the project.
    #[command(visible_alias = "i")]
    Install {
        component: Option<String>,
        #[arg(short, long)]
        catalog: Option<String>,
        #[arg(short, long, visible_alias = "version")]
        release: Option<String>,
    },
    /// Delete a published component version from the registry.
    #[command(visible_alias = "r")]
    Remove {
        component: String,
        #[arg(short, long)]
        catalog: Option<String>,
        #[arg(short, long, visible_alias = "version")]
        release: Option<String>,
        /// Also drop the local install and the pin.
        #[arg(short, long)]
        purge: bool,
    },
    /// List the published files of a component version.
    Files {
        component: String,
        #[arg(short, long)]
        catalog: Option<String>,
        #[arg(short, long, visible_alias = "version")]
        release: Option<String>,
    },
    /// Register a new registry account.
    #[command(visible_alias = "s")]
    Signup {
        #[arg(long)]
        user: String,
        #[arg(long, env = "DOMY_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        mail: String,
    },
    /// Authenticate and store the access token.
    #[command(visible_alias = "l")]
    Login {
        #[arg(long)]
        user: String,
        #[arg(long, env = "DOMY_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Run the project build.
    Build,
    /// Print a shell completion script.
    Completions {
        #[arg(value_enum)]
        shell: CliCompletionShell,
    },
}

impl Commands {
    fn action(&self) -> &'static str {
        match self {
            Self::Publish { .. } => "publish",
            Self::Install { .. } => "install",
            Self::Remove { .. } => "remove",
            Self::Files { .. } => "files",
            Self::Signup { .. } => "signup",
            Self::Login { .. } => "login",
            Self::Build => "build",
            Self::Completions { .. } => "completions",
        }
    }

    /// Commands whose output is meant for other programs skip the banner.
    fn shows_banner(&self) -> bool {
        !matches!(self, Self::Files { .. } | Self::Completions { .. })
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliCompletionShell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

impl From<CliCompletionShell> for Shell {
    fn from(value: CliCompletionShell) -> Self {
        match value {
            CliCompletionShell::Bash => Shell::Bash,
            CliCompletionShell::Zsh => Shell::Zsh,
            CliCompletionShell::Fish => Shell::Fish,
            CliCompletionShell::Powershell => Shell::PowerShell,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let renderer = TerminalRenderer::current();
    let action = cli.command.action();
    let banner = cli.command.shows_banner();

    match run_cli(cli, renderer) {
        Ok(()) => {
            if banner {
                renderer.print_success_banner(action);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::debug!("{action} failed: {err:?}");
            renderer.print_failure_banner(action, &err);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}
