//! Folio - project description tooling for the terminal.
//!
//! # Usage
//!
//! ```bash
//! folio render description.md
//! folio render --watch description.md
//! folio format description.md --action bold --start 0 --end 5 --write
//! folio insert-image description.md screenshot.png --alt "Dashboard"
//! folio projects list
//! ```

use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use crossterm::{cursor::MoveTo, execute, terminal::Clear, terminal::ClearType};

use folio::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    parse_flag_tokens, save_config_flags,
};
use folio::editor::{EditorBuffer, FormatAction, ToolbarAction, apply_to, wrap_selection};
use folio::markup::{DisplayBlock, render, render_preview};
use folio::perf;
use folio::project::{JsonFileStore, ProjectDraft, ProjectStore, ProjectSummary, featured};
use folio::terminal::{TerminalRenderer, Theme};
use folio::watcher::{DEFAULT_DEBOUNCE, DescriptionWatcher};

const WATCH_POLL: Duration = Duration::from_millis(50);

/// Project description tooling for a portfolio of daily builds
#[derive(Parser, Debug)]
#[command(name = "folio", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Print machine-readable JSON instead of styled text
    #[arg(long, global = true)]
    json: bool,

    /// Color theme for styled output (light or dark)
    #[arg(long, global = true, value_enum)]
    theme: Option<folio::config::ThemeMode>,

    /// Enable performance logging
    #[arg(long, global = true)]
    perf: bool,

    /// Write render and edit debug events to a file
    #[arg(long, global = true, value_name = "PATH")]
    render_debug_log: Option<PathBuf>,

    /// Project store file
    #[arg(long, global = true, value_name = "PATH")]
    store: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long, global = true)]
    save: bool,

    /// Clear saved defaults
    #[arg(long, global = true)]
    clear: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a description file
    Render {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Re-render whenever the file changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Apply a formatting action to the selected range of a description
    Format {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[arg(short, long, value_enum)]
        action: FormatAction,

        /// Selection start (char offset); defaults to the end of the text
        #[arg(long)]
        start: Option<usize>,

        /// Selection end (char offset); defaults to the start
        #[arg(long)]
        end: Option<usize>,

        /// Text inserted when the selection is empty
        #[arg(long)]
        placeholder: Option<String>,

        /// Write the result back to FILE
        #[arg(long)]
        write: bool,
    },

    /// Insert image markup into a description
    InsertImage {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Local image file (embedded as a data URI) or an image URL
        #[arg(value_name = "IMAGE")]
        image: String,

        /// Alt text; defaults to the image file name
        #[arg(long)]
        alt: Option<String>,

        /// Insertion point (char offset); defaults to the end of the text
        #[arg(long)]
        at: Option<usize>,

        /// Write the result back to FILE
        #[arg(long)]
        write: bool,
    },

    /// Print an image file as a data URI
    DataUri {
        #[arg(value_name = "IMAGE")]
        image: PathBuf,
    },

    /// Manage stored projects
    Projects {
        #[command(subcommand)]
        command: ProjectsCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ProjectsCommand {
    /// List projects
    List {
        /// Only the first N projects, as on the home page
        #[arg(long, value_name = "N")]
        featured: Option<usize>,
    },
    /// Show one project with its rendered description
    Show { id: u64 },
    /// Add a project
    Add(DraftArgs),
    /// Change fields of a project
    Edit {
        id: u64,
        #[command(flatten)]
        fields: DraftArgs,
    },
    /// Delete a project
    Delete { id: u64 },
}

#[derive(Args, Debug, Default)]
struct DraftArgs {
    #[arg(long)]
    title: Option<String>,
    #[arg(long, conflicts_with = "description_file")]
    description: Option<String>,
    /// Read the description from a file
    #[arg(long, value_name = "PATH")]
    description_file: Option<PathBuf>,
    /// Day number (1-30)
    #[arg(long)]
    day: Option<String>,
    /// Project date (YYYY-MM-DD)
    #[arg(long)]
    date: Option<String>,
    /// Comma-separated tech stack
    #[arg(long)]
    tech: Option<String>,
    #[arg(long)]
    live_link: Option<String>,
    #[arg(long)]
    github_link: Option<String>,
    #[arg(long)]
    image_url: Option<String>,
}

impl DraftArgs {
    /// Overwrite the draft fields given on the command line.
    fn apply(self, draft: &mut ProjectDraft) -> Result<()> {
        let description = match self.description_file {
            Some(path) => Some(read_text(&path)?),
            None => self.description,
        };
        let fields = [
            (&mut draft.title, self.title),
            (&mut draft.description, description),
            (&mut draft.day_number, self.day),
            (&mut draft.project_date, self.date),
            (&mut draft.tech_stack, self.tech),
            (&mut draft.live_link, self.live_link),
            (&mut draft.github_link, self.github_link),
            (&mut draft.image_url, self.image_url),
        ];
        for (slot, value) in fields {
            if let Some(value) = value {
                *slot = value;
            }
        }
        Ok(())
    }
}

/// Effective output settings after merging saved defaults.
struct Output {
    json: bool,
    renderer: TerminalRenderer,
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn write_text(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))
}

fn print_blocks(out: &Output, blocks: &[DisplayBlock]) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    if out.json {
        serde_json::to_writer_pretty(&mut stdout, blocks).context("Failed to encode blocks")?;
        writeln!(stdout)?;
    } else {
        out.renderer.write_blocks(&mut stdout, blocks)?;
    }
    stdout.flush()?;
    Ok(())
}

fn run_render(out: &Output, file: &Path, watch: bool) -> Result<()> {
    if !watch {
        let text = read_text(file)?;
        let blocks = {
            let _scope = perf::scope("render");
            render(&text)
        };
        perf::log_event("render.blocks", format!("count={}", blocks.len()));
        return print_blocks(out, &blocks);
    }

    let mut watcher = DescriptionWatcher::new(file, DEFAULT_DEBOUNCE)
        .with_context(|| format!("Failed to watch {}", file.display()))?;
    loop {
        // The file may be briefly missing mid-save; keep the last frame.
        match read_text(file) {
            Ok(text) => {
                let blocks = render_preview(&text);
                perf::log_event("watch.render", format!("count={}", blocks.len()));
                if !out.json {
                    execute!(std::io::stdout(), Clear(ClearType::All), MoveTo(0, 0))?;
                }
                print_blocks(out, &blocks)?;
            }
            Err(err) => tracing::warn!("{err:#}"),
        }
        watcher.wait_for_change(WATCH_POLL);
    }
}

/// Print or save the edited text and report the caret.
fn finish_edit(out: &Output, file: &Path, buffer: &EditorBuffer, write: bool) -> Result<()> {
    let text = buffer.text();
    let selection = buffer.selection();
    if write {
        write_text(file, &text)?;
    }
    if out.json {
        let value = serde_json::json!({
            "text": text,
            "selection": { "start": selection.start, "end": selection.end },
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else if write {
        println!("Updated {} (cursor at {})", file.display(), selection.start);
    } else {
        print!("{text}");
        if !text.ends_with('\n') {
            println!();
        }
        eprintln!("cursor at {}", selection.start);
    }
    Ok(())
}

fn run_format(
    out: &Output,
    file: &Path,
    action: FormatAction,
    range: (Option<usize>, Option<usize>),
    placeholder: Option<&str>,
    write: bool,
) -> Result<()> {
    let mut buffer = EditorBuffer::from_text(&read_text(file)?);
    let start = range.0.unwrap_or_else(|| buffer.len_chars());
    let end = range.1.unwrap_or(start);
    buffer.try_select(start, end)?;

    let pending = match placeholder {
        Some(placeholder) => {
            let markers = action.markers();
            wrap_selection(&mut buffer, markers.prefix, markers.suffix, placeholder)
        }
        None => apply_to(Some(&mut buffer), &ToolbarAction::from(action))?,
    };
    buffer.restore_selection(pending);
    perf::log_event("edit.format", format!("{action:?} {:?}", buffer.selection()));
    finish_edit(out, file, &buffer, write)
}

fn run_insert_image(
    out: &Output,
    file: &Path,
    image: &str,
    alt: Option<String>,
    at: Option<usize>,
    write: bool,
) -> Result<()> {
    let image_path = Path::new(image);
    let (source_ref, default_alt) = if image_path.is_file() {
        let stem = image_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        (folio::image::data_uri_for_file(image_path)?, stem)
    } else {
        (image.to_string(), String::new())
    };

    let mut buffer = EditorBuffer::from_text(&read_text(file)?);
    let offset = at.unwrap_or_else(|| buffer.len_chars());
    buffer.try_select(offset, offset)?;
    let action = ToolbarAction::Image {
        alt_text: alt.unwrap_or(default_alt),
        source_ref,
    };
    let pending = apply_to(Some(&mut buffer), &action)?;
    buffer.restore_selection(pending);
    finish_edit(out, file, &buffer, write)
}

fn run_projects(out: &Output, store_path: PathBuf, command: ProjectsCommand) -> Result<()> {
    let mut store = JsonFileStore::new(store_path);
    match command {
        ProjectsCommand::List { featured: limit } => {
            let projects = match limit {
                Some(n) => featured(&store, n)?,
                None => store.list()?,
            };
            let rows: Vec<ProjectSummary> =
                projects.iter().map(ProjectSummary::from_project).collect();
            if out.json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
                return Ok(());
            }
            if rows.is_empty() {
                println!("No projects in {}", store.path().display());
            }
            for row in rows {
                let day = row
                    .day_number
                    .map_or_else(String::new, |d| format!("Day {d}  "));
                println!("#{:<4}{day}{}", row.id, row.title);
                println!("      {}", row.tech_label());
                if !row.excerpt.is_empty() {
                    println!("      {}", row.excerpt);
                }
            }
        }
        ProjectsCommand::Show { id } => {
            let project = store.get(id)?;
            if out.json {
                println!("{}", serde_json::to_string_pretty(&project)?);
                return Ok(());
            }
            println!("{}", project.title);
            if let Some(day) = project.day_number {
                println!("Day {day}");
            }
            if let Some(date) = project.project_date {
                println!("{}", date.format("%B %-d, %Y"));
            }
            println!("{}", project.tech_stack.join(", "));
            for link in [&project.live_link, &project.github_link].into_iter().flatten() {
                println!("{link}");
            }
            println!();
            print_blocks(out, &render(&project.description))?;
        }
        ProjectsCommand::Add(fields) => {
            let mut draft = ProjectDraft::default();
            fields.apply(&mut draft)?;
            let project = store.insert(draft.validate()?)?;
            println!("Added project #{}: {}", project.id, project.title);
        }
        ProjectsCommand::Edit { id, fields } => {
            let mut draft = ProjectDraft::from_project(&store.get(id)?);
            fields.apply(&mut draft)?;
            let project = store.update(id, draft.validate()?)?;
            println!("Updated project #{}: {}", project.id, project.title);
        }
        ProjectsCommand::Delete { id } => {
            store.delete(id)?;
            println!("Deleted project #{id}");
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    perf::set_enabled(effective.perf);
    let render_debug_log_path = effective
        .render_debug_log
        .clone()
        .or_else(|| std::env::var_os("FOLIO_RENDER_DEBUG_LOG").map(PathBuf::from));
    if let Err(err) = perf::set_debug_log_path(render_debug_log_path.as_deref()) {
        eprintln!(
            "[warn] Failed to initialize render debug log {}: {}",
            render_debug_log_path
                .as_ref()
                .map_or_else(|| "<unset>".to_string(), |p| p.display().to_string()),
            err
        );
    }

    let color = !effective.no_color && std::io::stdout().is_terminal();
    let out = Output {
        json: effective.json,
        renderer: TerminalRenderer::new(
            color,
            Theme::for_mode(effective.theme.unwrap_or_default()),
        ),
    };

    match cli.command {
        Command::Render { file, watch } => run_render(&out, &file, watch || effective.watch),
        Command::Format {
            file,
            action,
            start,
            end,
            placeholder,
            write,
        } => run_format(
            &out,
            &file,
            action,
            (start, end),
            placeholder.as_deref(),
            write,
        ),
        Command::InsertImage {
            file,
            image,
            alt,
            at,
            write,
        } => run_insert_image(&out, &file, &image, alt, at, write),
        Command::DataUri { image } => {
            println!("{}", folio::image::data_uri_for_file(&image)?);
            Ok(())
        }
        Command::Projects { command } => run_projects(&out, effective.store_path(), command),
    }
}
