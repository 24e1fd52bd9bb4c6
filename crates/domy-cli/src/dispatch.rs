use crate::*;

pub(crate) fn run_cli(cli: Cli, renderer: TerminalRenderer) -> Result<()> {
    let registry_url = cli.registry;

    match cli.command {
        Commands::Publish {
            component,
            catalog,
            release,
            build,
            dry_run,
        } => {
            let layout = current_layout()?;
            if build {
                run_build(&layout)?;
            }
            let config = load_user_config()?;
            let request = GatherRequest {
                name: component,
                version: release,
                catalog,
            };

            if dry_run {
                let prepared = plan(&layout, config.as_ref(), &request)?;
                renderer.print_lines(&format_plan_lines(&prepared));
                return Ok(());
            }

            let registry = open_registry(&registry_url)?;
            let spinner = renderer.start_spinner("publish");
            let report = gather(&registry, &layout, config.as_ref(), &request);
            spinner.finish();
            renderer.print_lines(&format_gather_lines(&report?, renderer.style()));
        }
        Commands::Install {
            component,
            catalog,
            release,
        } => {
            let layout = current_layout()?;
            let config = load_user_config()?;
            let registry = open_registry(&registry_url)?;
            let request = ScatterRequest {
                catalog,
                component,
                version: release,
            };

            let spinner = renderer.start_spinner("install");
            let report = scatter_with_report(&registry, &layout, config.as_ref(), &request);
            spinner.finish();
            let report = report?;
            renderer.print_lines(&format_scatter_lines(&report, renderer.style()));
            report.into_result()?;
        }
        Commands::Remove {
            component,
            catalog,
            release,
            purge,
        } => {
            let layout = if purge { Some(current_layout()?) } else { None };
            let config = load_user_config()?;
            let registry = open_registry(&registry_url)?;
            let request = RemoveRequest {
                catalog,
                component,
                version: release,
                purge,
            };

            let spinner = renderer.start_spinner("remove");
            let report = remove(&registry, layout.as_ref(), config.as_ref(), &request);
            spinner.finish();
            renderer.print_lines(&format_remove_lines(&report?, renderer.style()));
        }
        Commands::Files {
            component,
            catalog,
            release,
        } => {
            let config = load_user_config()?;
            let catalog = resolve_catalog(catalog.as_deref(), config.as_ref())?;
            let version = resolve_version(release.as_deref());
            let registry = open_registry(&registry_url)?;
            let listing = RegistryPath::listing(&catalog, &component, &version)?;
            for file in registry.list(&listing)? {
                println!("{file}");
            }
        }
        Commands::Signup {
            user,
            password,
            mail,
        } => {
            let registry = open_registry(&registry_url)?;
            let config = signup(&registry, &user, &password, &mail)?;
            let path = save_user_config(&config)?;
            renderer.print_status(
                "ok",
                &format!("signed up as {} (config: {})", config.user, path.display()),
            );
        }
        Commands::Login { user, password } => {
            let registry = open_registry(&registry_url)?;
            let config = login(&registry, &user, &password)?;
            let path = save_user_config(&config)?;
            renderer.print_status(
                "ok",
                &format!("logged in as {} (config: {})", config.user, path.display()),
            );
        }
        Commands::Build => {
            let layout = current_layout()?;
            run_build(&layout)?;
        }
        Commands::Completions { shell } => {
            let mut stdout = std::io::stdout().lock();
            write_completions_script(shell, &mut stdout)?;
        }
    }

    Ok(())
}

fn current_layout() -> Result<ProjectLayout> {
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    Ok(ProjectLayout::discover(&cwd)?)
}

fn open_registry(url: &str) -> Result<HttpRegistry> {
    HttpRegistry::new(url).with_context(|| format!("invalid registry url: {url}"))
}

fn user_config_store() -> Result<UserConfigStore> {
    Ok(UserConfigStore::new(default_config_root()?))
}

fn load_user_config() -> Result<Option<UserConfig>> {
    let store = user_config_store()?;
    store.load().with_context(|| {
        format!(
            "failed loading user config: {}",
            store.config_path().display()
        )
    })
}

fn save_user_config(config: &UserConfig) -> Result<PathBuf> {
    Ok(user_config_store()?.save(config)?)
}

fn run_build(layout: &ProjectLayout) -> Result<()> {
    CommandBuilder::default()
        .build(layout.root())
        .with_context(|| format!("failed building project in {}", layout.root().display()))
}
