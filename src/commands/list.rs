use super::Session;
use crate::core::identity::WorktreeRecord;
use crate::core::list::list_worktrees;
use crate::core::status::WorktreeStatus;
use crate::git::GitCommand;
use crate::output::Output;
use crate::styles;
use anyhow::Result;
use tabled::{builder::Builder, settings::Style};

#[derive(clap::Args, Debug)]
#[command(about = "List the main repository and its worktrees")]
#[command(long_about = r#"
Lists the main repository followed by every worktree under the worktrees
directory, with its branch and status (ok, detached, locked, prunable, or
missing when git does not know the directory).

--porcelain prints one 'path<TAB>branch<TAB>status' line per worktree.
--json prints an array of objects.
"#)]
pub struct Args {
    #[arg(long, conflicts_with = "json", help = "Tab-separated output for scripts")]
    porcelain: bool,

    #[arg(long, help = "Output in JSON format")]
    json: bool,
}

pub fn run(args: Args, git: &GitCommand, output: &mut dyn Output) -> Result<()> {
    let session = Session::open(git, output)?;
    let records = list_worktrees(&session.git, &session.ctx, &session.layout)?;

    if args.json {
        output.raw(&format!("{}\n", serde_json::to_string_pretty(&records)?));
    } else if args.porcelain {
        for record in &records {
            output.raw(&format!("{}\n", porcelain_line(record)));
        }
    } else {
        output.raw(&format!("{}\n", render_table(&records, styles::colors_enabled())));
    }
    Ok(())
}

fn porcelain_line(record: &WorktreeRecord) -> String {
    format!(
        "{}\t{}\t{}",
        record.path.display(),
        record.branch,
        record.status
    )
}

fn render_table(records: &[WorktreeRecord], use_color: bool) -> String {
    let mut builder = Builder::new();
    let header: Vec<String> = ["", "Branch", "Path", "Status"]
        .iter()
        .map(|h| {
            if use_color && !h.is_empty() {
                styles::dim(h)
            } else {
                h.to_string()
            }
        })
        .collect();
    builder.push_record(header);

    for record in records {
        let marker = if record.is_main { "1" } else { "" };
        builder.push_record([
            marker.to_string(),
            record.branch.clone(),
            record.path.display().to_string(),
            format_status(record.status, use_color),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::blank());
    table.to_string()
}

fn format_status(status: WorktreeStatus, use_color: bool) -> String {
    let text = status.as_str();
    if !use_color {
        return text.to_string();
    }
    match status {
        WorktreeStatus::Ok => styles::green(text),
        WorktreeStatus::Detached | WorktreeStatus::Prunable => styles::yellow(text),
        WorktreeStatus::Locked | WorktreeStatus::Missing => styles::red(text),
    }
}
