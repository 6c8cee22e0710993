use crate::config::{
    parse_list_scope, parse_write_scope, ConfigResolver, ConfigStore, GitConfigStore, ListScope,
};
use crate::core::repo::RepositoryContext;
use crate::core::OutputSink;
use crate::error::GtrError;
use crate::git::GitCommand;
use crate::output::Output;
use crate::settings;
use anyhow::Result;

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Get,
    Set,
    Add,
    Unset,
    List,
}

#[derive(clap::Args, Debug)]
#[command(about = "Read and write gtr configuration")]
#[command(long_about = r#"
Reads and writes gtr.* keys in git config.

Without --scope, 'get' prints the effective value: local, then .gtrconfig at
the repository root, then global, then system, then the GTR_* environment
variable, then the built-in default. Multi-valued keys such as
gtr.copy.include print every distinct value.

'set', 'add' and 'unset' write to --scope (default: local). 'list' shows every
gtr.* entry with the scope it comes from (default: all scopes).

Scopes: local, project (.gtrconfig), global, system.
"#)]
pub struct Args {
    #[arg(value_enum, help = "What to do")]
    action: Action,

    #[arg(help = "Config key, e.g. gtr.worktrees.dir")]
    key: Option<String>,

    #[arg(help = "Value for set and add")]
    value: Option<String>,

    #[arg(long, value_name = "SCOPE", help = "local, project, global or system")]
    scope: Option<String>,
}

pub fn run(args: Args, git: &GitCommand, output: &mut dyn Output) -> Result<()> {
    let store = match RepositoryContext::discover(git) {
        Ok(ctx) => GitConfigStore::new(git, &ctx),
        Err(GtrError::NotInRepository) => {
            output.debug("Not in a repository; only global and system scopes are available");
            GitConfigStore::outside_repo(git)
        }
        Err(e) => return Err(e.into()),
    };
    let resolver = ConfigResolver::new(store);
    execute(&args, &resolver, output)
}

fn execute<S: ConfigStore>(
    args: &Args,
    resolver: &ConfigResolver<S>,
    output: &mut dyn Output,
) -> Result<()> {
    let scope = args.scope.as_deref();
    match args.action {
        Action::Get => {
            let key = required(&args.key, "get", "KEY")?;
            let list_scope = parse_list_scope(scope, &mut OutputSink(&mut *output));
            for value in get(resolver, key, list_scope, output)? {
                output.raw(&format!("{value}\n"));
            }
        }
        Action::Set => {
            let key = required(&args.key, "set", "KEY")?;
            let value = required(&args.value, "set", "VALUE")?;
            let scope = parse_write_scope(scope, "set")?;
            resolver.set(key, value, scope)?;
            output.step(&format!("Set {key}={value} in {scope}"));
        }
        Action::Add => {
            let key = required(&args.key, "add", "KEY")?;
            let value = required(&args.value, "add", "VALUE")?;
            let scope = parse_write_scope(scope, "add")?;
            resolver.add(key, value, scope)?;
            output.step(&format!("Added {key}={value} to {scope}"));
        }
        Action::Unset => {
            let key = required(&args.key, "unset", "KEY")?;
            let scope = parse_write_scope(scope, "unset")?;
            resolver.unset(key, scope)?;
            output.step(&format!("Unset {key} in {scope}"));
        }
        Action::List => {
            let list_scope = parse_list_scope(scope, &mut OutputSink(&mut *output));
            for entry in resolver.list(list_scope)? {
                output.raw(&format!(
                    "{:<8} {}={}\n",
                    entry.scope.label(),
                    entry.key,
                    entry.value
                ));
            }
        }
    }
    Ok(())
}

fn get<S: ConfigStore>(
    resolver: &ConfigResolver<S>,
    key: &str,
    scope: ListScope,
    output: &mut dyn Output,
) -> Result<Vec<String>> {
    match scope {
        ListScope::Only(scope) => Ok(resolver.get_in(key, scope)?),
        ListScope::Auto if settings::is_multi(key) => Ok(resolver.get_all(key)?),
        ListScope::Auto => {
            let entry = resolver.resolve(key, settings::default_for(key).unwrap_or_default())?;
            output.debug(&format!("{key} comes from {}", entry.scope));
            Ok(if entry.value.is_empty() {
                Vec::new()
            } else {
                vec![entry.value]
            })
        }
    }
}

fn required<'a>(value: &'a Option<String>, action: &str, what: &str) -> Result<&'a str> {
    value
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("'config {action}' requires {what}"))
}
