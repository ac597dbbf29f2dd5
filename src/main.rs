use clap::{Parser, Subcommand};
use cvpress::config::{self, AppConfig};
use cvpress::export::{self, ChromeRasterizer, ExportSettings};
use cvpress::model::{Cv, Locale};
use cvpress::output;
use cvpress::photo::{self, CropRect, CropSession, CropSettings, DisplaySize, Point};
use cvpress::render::render_document;
use cvpress::store::{self, CvStore, FileStore};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the log filter, e.g. `CVPRESS_LOG=cvpress=debug`.
const LOG_ENV: &str = "CVPRESS_LOG";

#[derive(Parser)]
#[command(name = "cvpress")]
#[command(about = "Local-first résumé builder with PDF export")]
#[command(long_about = "\
Local-first résumé builder with PDF export

CVs are stored as one JSON file in the data directory. Each CV renders as an
A4 document in English or Korean and exports to a paginated PDF through
headless Chrome.

Data directory:

  .cvpress/
  ├── config.toml          # Optional overrides (see 'cvpress gen-config')
  └── cvpress_cvs.json     # Every CV, keyed by id

Typical session:

  cvpress new \"Backend roles\"       # prints the new id
  cvpress import jane.json          # or bring records from a file
  cvpress crop <id> portrait.jpg    # 200×200 profile photo
  cvpress template <id> template1   # layout choice
  cvpress status <id>               # which sections still need work
  cvpress preview <id> --out cv.html
  cvpress export <id> --out-dir out # out/Backend_roles_CV.pdf

Logging goes to stderr and is controlled by CVPRESS_LOG (default: warn).")]
#[command(version)]
struct Cli {
    /// Directory holding the CV store and config.toml
    #[arg(long, default_value = ".cvpress", global = true)]
    data_dir: PathBuf,

    /// Config file to use instead of <data-dir>/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create an empty CV and print its id
    New { name: String },
    /// List CVs, most recently edited first
    List,
    /// Show a CV overview
    Show { id: String },
    /// Show which sections are complete
    Status { id: String },
    /// Delete a CV
    Delete { id: String },
    /// Set the document language (en or ko)
    Locale { id: String, locale: Locale },
    /// Choose the document template (unknown ids render with the classic layout)
    Template { id: String, template: String },
    /// Add a skill tag
    AddSkill { id: String, skill: String },
    /// Import CVs from a JSON file (one record, an array, or a store file)
    Import { file: PathBuf },
    /// Render a CV to HTML
    Preview {
        id: String,
        /// Override the CV's own language
        #[arg(long)]
        locale: Option<Locale>,
        /// Write to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Export a CV as a multi-page A4 PDF
    Export {
        id: String,
        /// Override the CV's own language
        #[arg(long)]
        locale: Option<Locale>,
        /// Directory for the PDF
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Crop an image into the CV's profile photo
    Crop {
        id: String,
        /// Image file path or data: URI
        image: String,
        /// Left edge of the selection, in display pixels
        #[arg(long, default_value_t = 50.0)]
        x: f64,
        /// Top edge of the selection, in display pixels
        #[arg(long, default_value_t = 50.0)]
        y: f64,
        /// Side of the square selection, in display pixels
        #[arg(long, default_value_t = 200.0)]
        size: f64,
        /// Width the image is displayed at (defaults to its natural width)
        #[arg(long)]
        display_width: Option<f64>,
        /// Height the image is displayed at (defaults to its natural height)
        #[arg(long)]
        display_height: Option<f64>,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(failure) => {
            failure.report();
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Failure> {
    let app_config = if matches!(cli.command, Command::GenConfig) {
        AppConfig::default()
    } else {
        load_app_config(&cli).or_fail("Invalid configuration")?
    };
    let cvs = CvStore::with_key(
        FileStore::new(&cli.data_dir),
        app_config.storage.key.clone(),
    );

    match cli.command {
        Command::New { name } => {
            let name = name.trim();
            if name.is_empty() {
                output::print_notification("Name required", "Please enter a name for your CV");
                return Err(Failure::reported());
            }
            let mut cv = cvs.create(name);
            cvs.save(&mut cv).or_fail(SAVE_FAILED)?;
            println!("{}", cv.id);
        }
        Command::List => {
            output::print_cv_list(&cvs.load_all());
        }
        Command::Show { id } => {
            if let Some(cv) = find_or_list(&cvs, &id) {
                output::print_cv_details(&cv);
            }
        }
        Command::Status { id } => {
            if let Some(cv) = find_or_list(&cvs, &id) {
                output::print_status(&cv);
            }
        }
        Command::Delete { id } => {
            if cvs.delete(&id).or_fail("Failed to delete CV")? {
                output::print_notification("CV deleted", &id);
            } else {
                print_not_found(&cvs);
            }
        }
        Command::Locale { id, locale } => {
            if let Some(mut cv) = find_or_list(&cvs, &id) {
                cv.set_locale(locale);
                cvs.save(&mut cv).or_fail(SAVE_FAILED)?;
                output::print_notification("Language updated", locale.tag());
            }
        }
        Command::Template { id, template } => {
            let template = template.trim();
            if template.is_empty() {
                output::print_notification("Template required", "Please choose a template id");
                return Err(Failure::reported());
            }
            if let Some(mut cv) = find_or_list(&cvs, &id) {
                cv.selected_template = template.to_string();
                cvs.save(&mut cv).or_fail(SAVE_FAILED)?;
                output::print_notification("Template saved", template);
            }
        }
        Command::AddSkill { id, skill } => {
            if let Some(mut cv) = find_or_list(&cvs, &id) {
                if cv.add_skill(&skill) {
                    cvs.save(&mut cv).or_fail(SAVE_FAILED)?;
                    output::print_notification("Skill added", skill.trim());
                } else {
                    output::print_notification("Skill not added", "blank or already listed");
                }
            }
        }
        Command::Import { file } => {
            let raw = std::fs::read_to_string(&file).or_fail(IMPORT_FAILED)?;
            let records = store::parse_import(&raw).or_fail(IMPORT_FAILED)?;
            for mut cv in records {
                cvs.save(&mut cv).or_fail(IMPORT_FAILED)?;
                println!("{}", cv.id);
            }
        }
        Command::Preview { id, locale, out } => {
            if let Some(cv) = find_or_list(&cvs, &id) {
                let html = render_document(&cv, locale.unwrap_or(cv.locale())).into_string();
                match out {
                    Some(path) => {
                        std::fs::write(&path, html).or_fail("Failed to write preview")?;
                        output::print_notification("Preview written", &path.display().to_string());
                    }
                    None => print!("{html}"),
                }
            }
        }
        Command::Export {
            id,
            locale,
            out_dir,
        } => {
            if let Some(cv) = find_or_list(&cvs, &id) {
                run_export(&cv, locale, &out_dir, &app_config)?;
            }
        }
        Command::Crop {
            id,
            image,
            x,
            y,
            size,
            display_width,
            display_height,
        } => {
            if let Some(mut cv) = find_or_list(&cvs, &id) {
                let source = photo::load_photo(&image).or_fail(PHOTO_FAILED)?;
                let display = DisplaySize::new(
                    display_width.unwrap_or(source.width() as f64),
                    display_height.unwrap_or(source.height() as f64),
                );
                let rect = place_selection(display, x, y, size);
                let settings = CropSettings::from(&app_config.photo);
                cv.personal_info.photo = photo::crop_to_data_uri(&source, rect, display, &settings)
                    .or_fail(PHOTO_FAILED)?;
                cvs.save(&mut cv).or_fail(PHOTO_FAILED)?;
                output::print_notification(
                    "Photo updated",
                    &format!("{0}×{0} JPEG", settings.output_size),
                );
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

const SAVE_FAILED: &str = "Failed to save CV";
const IMPORT_FAILED: &str = "Failed to import CVs";
const PHOTO_FAILED: &str = "Failed to update photo";

/// A failed command. The user gets a notification; the cause goes to the log.
struct Failure {
    title: &'static str,
    cause: Option<Box<dyn std::error::Error>>,
    /// Whether the cause is shown to the user or only logged.
    show_cause: bool,
}

impl Failure {
    /// The notification has already been printed.
    fn reported() -> Self {
        Self {
            title: "",
            cause: None,
            show_cause: false,
        }
    }

    /// Only the title is shown; the cause stays in the log.
    fn generic(title: &'static str, cause: impl Into<Box<dyn std::error::Error>>) -> Self {
        Self {
            title,
            cause: Some(cause.into()),
            show_cause: false,
        }
    }

    fn report(self) {
        let Some(cause) = self.cause else {
            return;
        };
        tracing::error!(error = %cause, "{}", self.title);
        let description = if self.show_cause {
            cause.to_string()
        } else {
            String::new()
        };
        output::print_notification(self.title, &description);
    }
}

trait OrFail<T> {
    fn or_fail(self, title: &'static str) -> Result<T, Failure>;
}

impl<T, E: Into<Box<dyn std::error::Error>>> OrFail<T> for Result<T, E> {
    fn or_fail(self, title: &'static str) -> Result<T, Failure> {
        self.map_err(|e| Failure {
            title,
            cause: Some(e.into()),
            show_cause: true,
        })
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_app_config(cli: &Cli) -> Result<AppConfig, config::ConfigError> {
    match &cli.config {
        Some(path) => config::load_config_file(path),
        None => config::load_config(&cli.data_dir),
    }
}

/// Load a CV, or fall back to the list view with a notification.
fn find_or_list(cvs: &CvStore<FileStore>, id: &str) -> Option<Cv> {
    let found = cvs.load(id);
    if found.is_none() {
        tracing::info!(id, "CV not found");
        print_not_found(cvs);
    }
    found
}

fn print_not_found(cvs: &CvStore<FileStore>) {
    output::print_notification("CV not found", "The requested CV could not be found");
    println!();
    output::print_cv_list(&cvs.load_all());
}

/// Render, rasterize and write the PDF. Any failure is reported as one
/// generic notification; the cause goes to the log.
fn run_export(
    cv: &Cv,
    locale: Option<Locale>,
    out_dir: &Path,
    app_config: &AppConfig,
) -> Result<(), Failure> {
    println!("Generating PDF…");
    let html = render_document(cv, locale.unwrap_or(cv.locale())).into_string();
    let settings = ExportSettings::from(&app_config.export);
    let pdf = export::export_document(&html, &ChromeRasterizer::new(), &settings, &cv.name)
        .map_err(|e| Failure::generic(export::EXPORT_FAILED, e))?;
    let path = export::write_export(out_dir, &export::export_filename(&cv.name), &pdf.bytes)
        .map_err(|e| Failure::generic(export::EXPORT_FAILED, e))?;
    output::print_export_result(&path, pdf.page_count);
    Ok(())
}

/// Place a square selection at `(x, y)` the way a drag would, clamped so it
/// stays inside the displayed image.
fn place_selection(display: DisplaySize, x: f64, y: f64, size: f64) -> CropRect {
    let mut session = CropSession::with_rect(display, CropRect::square(0.0, 0.0, size));
    session.begin_drag(Point::new(0.0, 0.0));
    session.drag_to(Point::new(x, y));
    session.end_drag();
    session.rect()
}
