//! Afropedia terminal client.

use std::fmt::Display;
use std::path::PathBuf;
use std::process::ExitCode;

use afropedia::{
    backend::{Backend, HttpBackend},
    error::{AppError, Result},
    models::{API_URL_ENV, Config, ReviewStatus, Verdict},
    pages::Pages,
    render::{Alert, Page},
    services::{
        ArticleForm, BookForm, CommentThread, CompletionForm, FlagForm, ReviewForm,
        decide_revision,
    },
    session::Session,
    utils::normalize_title,
};
use clap::{Args, Parser, Subcommand};

/// Afropedia - peer-reviewed encyclopedia client
#[derive(Parser, Debug)]
#[command(
    name = "afropedia",
    version,
    about = "Read, edit and review Afropedia articles from the terminal"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "afropedia.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and store the session token
    Login {
        /// Username or email
        identifier: String,
        #[arg(long, env = "AFROPEDIA_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// List all articles
    Articles,

    /// Search articles and books
    Search { query: String },

    /// Show an article with its references
    Article {
        title: String,
        /// Show every reference instead of the first few
        #[arg(long)]
        all_references: bool,
    },

    /// Show the revision history of an article
    History { title: String },

    /// Show one revision with its diff and reviews
    Revision { title: String, revision_id: i64 },

    /// Show what a revision changed
    Diff { title: String, revision_id: i64 },

    /// List the references of an article
    References {
        title: String,
        #[arg(long)]
        all: bool,
    },

    /// Comment on a revision
    Comment {
        title: String,
        revision_id: i64,
        text: String,
    },

    /// Publish a new article
    CreateArticle {
        title: String,
        #[command(flatten)]
        body: ArticleBody,
    },

    /// Save a new revision of an article
    EditArticle {
        title: String,
        #[command(flatten)]
        body: ArticleBody,
    },

    /// List or search the book library
    Books {
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show one book
    Book { id: i64 },

    /// Add a book to the library
    AddBook {
        #[command(flatten)]
        fields: BookFields,
    },

    /// Edit a library book; omitted fields keep their current value
    EditBook {
        id: i64,
        #[command(flatten)]
        fields: BookFields,
    },

    /// Flag content for moderators
    Flag {
        /// Kind of content, e.g. article, revision, comment
        #[arg(long, default_value = "article")]
        content_type: String,
        content_id: i64,
        /// inappropriate, spam, inaccurate, copyright or other
        #[arg(long = "type", default_value = "")]
        flag_type: String,
        #[arg(long, default_value = "")]
        reason: String,
    },

    /// List peer reviews of a revision
    Reviews { revision_id: i64 },

    /// Show the reviews assigned to the logged-in reviewer
    ReviewDashboard,

    /// Review a revision
    Review {
        revision_id: i64,
        #[command(flatten)]
        verdict: ReviewArgs,
    },

    /// Complete an assigned review
    CompleteReview {
        review_id: i64,
        #[command(flatten)]
        verdict: ReviewArgs,
    },

    /// Approve a revision
    Approve {
        revision_id: i64,
        #[arg(long)]
        reason: Option<String>,
    },

    /// Reject a revision
    Reject {
        revision_id: i64,
        #[arg(long)]
        reason: Option<String>,
    },

    /// Show notifications
    Notifications {
        /// Only unread notifications
        #[arg(long)]
        unread: bool,
        /// Mark a notification as read before showing the list
        #[arg(long = "read", value_name = "ID")]
        read: Vec<u64>,
        /// Mark every notification as read
        #[arg(long, conflicts_with = "read")]
        read_all: bool,
        /// Hide a notification
        #[arg(long, value_name = "ID")]
        dismiss: Vec<u64>,
    },

    /// List articles written by the logged-in user
    MyArticles,

    /// Validate configuration
    Validate,
}

#[derive(Args, Debug)]
struct ArticleBody {
    /// Markdown content
    #[arg(long, conflicts_with = "file")]
    content: Option<String>,
    /// Read markdown content from a file
    #[arg(long)]
    file: Option<PathBuf>,
    /// Edit summary
    #[arg(long, default_value = "")]
    comment: String,
}

#[derive(Args, Debug)]
struct BookFields {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    author: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    date: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    cover: Option<String>,
    #[arg(long)]
    isbn: Option<String>,
}

impl BookFields {
    fn apply(self, form: &mut BookForm) {
        let fields = [
            (self.title, &mut form.title),
            (self.author, &mut form.author),
            (self.date, &mut form.publication_date),
            (self.description, &mut form.description),
            (self.cover, &mut form.cover_image),
            (self.isbn, &mut form.isbn),
        ];
        for (value, slot) in fields {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }
}

#[derive(Args, Debug)]
struct ReviewArgs {
    /// pending, approved, rejected or needs_changes
    #[arg(long)]
    status: String,
    /// 1 to 5
    #[arg(long)]
    score: u8,
    #[arg(long, default_value = "")]
    feedback: String,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Print a page; anything but a ready page is a failure.
fn show<T: Display>(page: Page<T>) -> ExitCode {
    print!("{page}");
    if page.is_ready() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Print the outcome of an action as an alert.
fn report(result: Result<Alert>, failure_title: &str) -> ExitCode {
    match result {
        Ok(alert) => {
            print!("{alert}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::debug!("{failure_title}: {e}");
            print!("{}", Alert::error(failure_title, e.user_message()));
            ExitCode::FAILURE
        }
    }
}

async fn read_body(body: ArticleBody) -> Result<(String, String)> {
    let content = match (body.content, body.file) {
        (Some(content), _) => content,
        (None, Some(path)) => tokio::fs::read_to_string(&path).await?,
        (None, None) => String::new(),
    };
    Ok((content, body.comment))
}

fn parse_status(raw: &str) -> Result<ReviewStatus> {
    raw.parse()
}

fn require_login(session: Option<&Session>) -> Result<&Session> {
    session.ok_or_else(|| {
        AppError::Unauthorized("Please log in with `afropedia login` first.".into())
    })
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config).with_env_overrides();
    log::debug!("Using backend {}", config.api.base_url);

    if let Command::Validate = cli.command {
        return Ok(validate(&config, &cli.config));
    }

    let token_file = config.session.token_file.clone();
    let session = Session::load(&token_file).await?;
    let backend = HttpBackend::from_config(&config, session)?;
    let session = backend.session().cloned();
    let user = session.as_ref().map(|s| &s.user);
    let pages = Pages::new(&backend, backend.base_url().clone(), config.display.clone());

    let code = match cli.command {
        Command::Login {
            identifier,
            password,
        } => {
            let result = async {
                let response = backend.login(&identifier, &password).await?;
                let session = Session::new(response.access_token, response.user);
                session.save(&token_file).await?;
                log::info!("Session saved to {}", token_file.display());
                Ok::<_, AppError>(Alert::success(
                    "Logged in",
                    format!("Welcome, {}!", session.user.display_name()),
                ))
            };
            report(result.await, "Login Failed")
        }

        Command::Logout => {
            let result = Session::clear(&token_file).await.map(|removed| {
                if removed {
                    Alert::success("Logged out", "Session removed.")
                } else {
                    Alert::info("Logged out", "No active session.")
                }
            });
            report(result, "Logout Failed")
        }

        Command::Whoami => {
            let result = async {
                require_login(session.as_ref())?;
                let profile = backend.profile().await?;
                let role = profile.role.as_deref().unwrap_or("user");
                Ok::<_, AppError>(Alert::info(
                    profile.display_name(),
                    format!("{} | {role}", profile.email),
                ))
            };
            report(result.await, "Not logged in")
        }

        Command::Articles => show(pages.articles().await),

        Command::Search { query } => show(pages.search(&query).await),

        Command::Article {
            title,
            all_references,
        } => show(pages.article(&normalize_title(&title), all_references).await),

        Command::History { title } => show(pages.history(&normalize_title(&title)).await),

        Command::Revision { title, revision_id } => {
            show(pages.revision(&normalize_title(&title), revision_id).await)
        }

        Command::Diff { title, revision_id } => {
            show(pages.diff(&normalize_title(&title), revision_id).await)
        }

        Command::References { title, all } => {
            show(pages.references(&normalize_title(&title), all).await)
        }

        Command::Comment {
            title,
            revision_id,
            text,
        } => {
            let mut thread = CommentThread::new(normalize_title(&title), revision_id, Vec::new());
            let result = thread
                .submit(&backend, &text)
                .await
                .map(|_| Alert::success("Success", "Comment added successfully!"));
            report(result, "Error")
        }

        Command::CreateArticle { title, body } => {
            let result = async {
                let (content, comment) = read_body(body).await?;
                let form = ArticleForm {
                    title,
                    content,
                    comment,
                };
                form.create(&backend).await.map(|(_, alert)| alert)
            };
            report(result.await, "Creation Failed")
        }

        Command::EditArticle { title, body } => {
            let result = async {
                let (content, comment) = read_body(body).await?;
                let form = ArticleForm {
                    title,
                    content,
                    comment,
                };
                form.update(&backend).await.map(|(_, alert)| alert)
            };
            report(result.await, "Update Failed")
        }

        Command::Books { search } => show(pages.books(search.as_deref()).await),

        Command::Book { id } => show(pages.book(id).await),

        Command::AddBook { fields } => {
            let mut form = BookForm::default();
            fields.apply(&mut form);
            let result = form.create(&backend).await.map(|(_, alert)| alert);
            report(result, "Error adding book")
        }

        Command::EditBook { id, fields } => {
            let result = async {
                let existing = backend.get_book(id).await?;
                let mut form = BookForm::from_book(&existing);
                fields.apply(&mut form);
                form.update(&backend, id).await.map(|(_, alert)| alert)
            };
            report(result.await, "Error updating book")
        }

        Command::Flag {
            content_type,
            content_id,
            flag_type,
            reason,
        } => {
            let form = FlagForm {
                content_type,
                content_id,
                flag_type,
                reason,
            };
            report(form.submit(&backend).await, "Error")
        }

        Command::Reviews { revision_id } => show(pages.reviews(revision_id).await),

        Command::ReviewDashboard => show(pages.review_dashboard(user).await),

        Command::Review {
            revision_id,
            verdict,
        } => {
            let result = async {
                let reviewer = require_login(session.as_ref())?;
                let form = ReviewForm {
                    revision_id,
                    reviewer_id: reviewer.user.id,
                    status: parse_status(&verdict.status)?,
                    score: verdict.score,
                    feedback: verdict.feedback,
                };
                form.submit(&backend).await
            };
            report(result.await, "Error")
        }

        Command::CompleteReview { review_id, verdict } => {
            let result = async {
                let form = CompletionForm {
                    review_id,
                    status: parse_status(&verdict.status)?,
                    score: verdict.score,
                    feedback: verdict.feedback,
                };
                form.submit(&backend).await
            };
            report(result.await, "Error")
        }

        Command::Approve {
            revision_id,
            reason,
        } => report(
            decide_revision(&backend, Verdict::Approve, revision_id, reason.as_deref()).await,
            "Failed to approve revision",
        ),

        Command::Reject {
            revision_id,
            reason,
        } => report(
            decide_revision(&backend, Verdict::Reject, revision_id, reason.as_deref()).await,
            "Failed to reject revision",
        ),

        Command::Notifications {
            unread,
            read,
            read_all,
            dismiss,
        } => {
            let page = pages.notifications(user, unread).await.map(|mut inbox| {
                if read_all {
                    inbox.mark_all_read();
                }
                for id in read {
                    if !inbox.mark_read(id) {
                        log::warn!("No notification #{id}");
                    }
                }
                for id in dismiss {
                    if !inbox.delete(id) {
                        log::warn!("No notification #{id}");
                    }
                }
                inbox
            });
            show(page)
        }

        Command::MyArticles => show(pages.my_articles(user).await),

        Command::Validate => validate(&config, &cli.config),
    };

    Ok(code)
}

/// Check the effective configuration and print it.
fn validate(config: &Config, path: &std::path::Path) -> ExitCode {
    log::info!("Validating configuration...");

    if let Err(e) = config.validate() {
        log::error!("Config validation failed: {}", e);
        print!("{}", Alert::error("Invalid configuration", e.user_message()));
        return ExitCode::FAILURE;
    }

    println!("Config file:      {}", path.display());
    println!("API base URL:     {} (override with {API_URL_ENV})", config.api.base_url);
    println!("User agent:       {}", config.api.user_agent);
    println!("Timeout:          {}s", config.api.timeout_secs);
    println!("Session file:     {}", config.session.token_file.display());
    println!("Date format:      {}", config.display.date_format);
    println!("Datetime format:  {}", config.display.datetime_format);
    println!(
        "Reference limit:  {}",
        config.display.reference_collapse_threshold
    );
    log::info!("All validations passed!");
    ExitCode::SUCCESS
}
