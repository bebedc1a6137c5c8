use std::path::{Path, PathBuf};

use chrono::{NaiveTime, Utc};
use clap::Parser;
use pretty_assertions::assert_eq;
use quotevault_core::models::{
    AccentColor, Category, CategoryId, Quote, QuoteId, QuoteWithCategory, ThemeMode,
};
use quotevault_core::share::ShareFormat;
use quotevault_core::viewmodels::SettingsState;

use crate::cli::{
    AuthCommands, Cli, CollectionsCommands, Commands, CompletionShell, ShareFormatArg,
};
use crate::commands::common::{
    check_error, find_category, format_quote_line, join_words, open_mirror, parse_collection_id,
    parse_quote_id, preview,
};
use crate::commands::settings::{parse_notification_time, SettingsChanges};
use crate::commands::share::output_file;
use crate::commands::completions::completion_script;
use crate::commands::discover::filter_cached_quotes;
use crate::commands::config::mask;
use crate::error::CliError;

fn category(name: &str) -> Category {
    Category {
        id: CategoryId::new(),
        name: name.to_string(),
        icon: None,
        color: None,
        created_at: Utc::now(),
    }
}

fn quote(text: &str, category: Option<Category>) -> QuoteWithCategory {
    QuoteWithCategory {
        quote: Quote {
            id: QuoteId::new(),
            text: text.to_string(),
            author: "Seneca".to_string(),
            author_image_url: None,
            category_id: category.as_ref().map(|category| category.id),
            likes_count: 0,
            comments_count: 0,
            is_quote_of_day: false,
            quote_of_day_date: None,
            created_at: Utc::now(),
        },
        category,
    }
}

#[test]
fn parses_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "quotevault",
        "discover",
        "--category",
        "Wisdom",
        "--pages",
        "3",
        "--profile",
        "work",
    ])
    .unwrap();

    assert_eq!(cli.profile.as_deref(), Some("work"));
    match cli.command {
        Commands::Discover {
            category, pages, ..
        } => {
            assert_eq!(category.as_deref(), Some("Wisdom"));
            assert_eq!(pages, 3);
        }
        _ => panic!("expected discover"),
    }
}

#[test]
fn browse_is_an_alias_for_discover() {
    let cli = Cli::try_parse_from(["quotevault", "browse", "-s", "courage"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Discover { search: Some(ref query), .. } if query == "courage"
    ));
}

#[test]
fn offline_flag_parses_for_discover_and_collections() {
    let cli = Cli::try_parse_from(["quotevault", "discover", "--offline"]).unwrap();
    assert!(matches!(cli.command, Commands::Discover { offline: true, .. }));

    let cli = Cli::try_parse_from(["quotevault", "collections", "list", "--offline", "--json"])
        .unwrap();
    assert!(matches!(
        cli.command,
        Commands::Collections {
            command: CollectionsCommands::List {
                offline: true,
                json: true
            }
        }
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn offline_discover_filters_mirrored_quotes() {
    let dir = tempfile::tempdir().unwrap();
    let mirror = open_mirror(Some(&dir.path().join("mirror.db"))).await.unwrap();
    let wisdom = category("Wisdom");
    let mut courage = quote("Courage is grace under pressure", Some(wisdom.clone()));
    courage.quote.author = "Hemingway".to_string();
    let quotes = vec![
        quote("Know thyself", Some(wisdom)),
        courage,
        quote("Stay hungry", Some(category("Motivation"))),
    ];
    mirror.record_quotes(&quotes).await.unwrap();
    let cached = mirror.cached_quotes(100).await.unwrap();
    assert_eq!(cached.len(), 3);

    let texts = |rows: Vec<QuoteWithCategory>| {
        rows.into_iter()
            .map(|row| row.quote.text)
            .collect::<Vec<_>>()
    };
    let mut by_category = texts(filter_cached_quotes(cached.clone(), Some(" wisdom "), None, 20));
    by_category.sort();
    assert_eq!(
        by_category,
        vec!["Courage is grace under pressure", "Know thyself"]
    );
    assert_eq!(
        texts(filter_cached_quotes(cached.clone(), None, Some("HEMING"), 20)),
        vec!["Courage is grace under pressure"]
    );
    assert_eq!(filter_cached_quotes(cached.clone(), None, None, 2).len(), 2);
    assert!(filter_cached_quotes(cached, Some("Love"), None, 20).is_empty());
}

#[test]
fn collection_names_join_trailing_words() {
    let cli =
        Cli::try_parse_from(["quotevault", "collections", "create", "Morning", "reads"]).unwrap();
    let Commands::Collections {
        command: CollectionsCommands::Create { name },
    } = cli.command
    else {
        panic!("expected collections create");
    };
    assert_eq!(join_words(&name), "Morning reads");
}

#[test]
fn share_defaults_to_text_in_ocean_style() {
    let id = QuoteId::new().to_string();
    let cli = Cli::try_parse_from(["quotevault", "share", id.as_str()]).unwrap();
    let Commands::Share { format, style, .. } = cli.command else {
        panic!("expected share");
    };
    assert_eq!(format, ShareFormatArg::Text);
    assert_eq!(ShareFormat::from(format), ShareFormat::Text);
    assert_eq!(style, "ocean");
}

#[test]
fn share_output_gets_format_extension() {
    assert_eq!(
        output_file(Path::new("out/quote"), ShareFormat::Card),
        PathBuf::from("out/quote.json")
    );
    assert_eq!(
        output_file(Path::new("quote"), ShareFormat::Text),
        PathBuf::from("quote.txt")
    );
    assert_eq!(
        output_file(Path::new("quote.md"), ShareFormat::Text),
        PathBuf::from("quote.md")
    );
}

#[test]
fn auth_login_requires_password() {
    assert!(Cli::try_parse_from(["quotevault", "auth", "login", "--email", "a@b.co"]).is_err());
    let cli = Cli::try_parse_from([
        "quotevault",
        "auth",
        "login",
        "--email",
        "a@b.co",
        "--password",
        "hunter22",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Commands::Auth {
            command: AuthCommands::Login { .. }
        }
    ));
}

#[test]
fn ids_must_be_uuids() {
    let id = QuoteId::new();
    assert_eq!(parse_quote_id(&id.to_string()).unwrap(), id);
    assert!(matches!(
        parse_quote_id("not-an-id"),
        Err(CliError::InvalidId { kind: "quote", .. })
    ));
    assert!(matches!(
        parse_collection_id("42"),
        Err(CliError::InvalidId {
            kind: "collection",
            ..
        })
    ));
}

#[test]
fn find_category_ignores_case_and_whitespace() {
    let categories = vec![category("Motivation"), category("Wisdom")];
    assert_eq!(
        find_category(&categories, "  wisdom ").unwrap().name,
        "Wisdom"
    );
    assert!(matches!(
        find_category(&categories, "Humor"),
        Err(CliError::UnknownCategory(name)) if name == "Humor"
    ));
}

#[test]
fn check_error_surfaces_view_model_messages() {
    assert!(check_error(None).is_ok());
    let error = check_error(Some("Service unavailable (503)".to_string())).unwrap_err();
    assert_eq!(error.to_string(), "Service unavailable (503)");
}

#[test]
fn preview_collapses_whitespace_and_truncates() {
    assert_eq!(preview("short\n  text", 20), "short text");
    assert_eq!(
        preview("This is a very long sentence that should be shortened", 20),
        "This is a very lo..."
    );
}

#[test]
fn quote_line_shows_full_id_heart_and_fallback_category() {
    let wisdom = quote(
        "Luck is what happens when preparation meets opportunity.",
        Some(category("Wisdom")),
    );
    let line = format_quote_line(&wisdom, true);
    assert!(line.starts_with(&wisdom.id().to_string()));
    assert!(line.contains('♥'));
    assert!(line.ends_with("[Wisdom]"));

    let uncategorized = quote("We suffer more in imagination than in reality.", None);
    let line = format_quote_line(&uncategorized, false);
    assert!(!line.contains('♥'));
    assert!(line.ends_with("[General]"));
}

#[test]
fn notification_time_uses_hours_and_minutes() {
    assert_eq!(
        parse_notification_time(" 07:30 ").unwrap(),
        NaiveTime::from_hms_opt(7, 30, 0).unwrap()
    );
    assert!(parse_notification_time("7pm").is_err());
    assert!(parse_notification_time("25:00").is_err());
}

#[test]
fn settings_changes_keep_omitted_values() {
    let mut state = SettingsState {
        display_name: "Ada".to_string(),
        ..SettingsState::default()
    };
    SettingsChanges {
        theme: Some("Dark".to_string()),
        accent: Some("purple".to_string()),
        notification_time: Some("21:15".to_string()),
        ..SettingsChanges::default()
    }
    .apply(&mut state)
    .unwrap();

    assert_eq!(state.display_name, "Ada");
    assert_eq!(state.theme, ThemeMode::Dark);
    assert_eq!(state.accent, AccentColor::Purple);
    assert_eq!(
        state.notification_time,
        NaiveTime::from_hms_opt(21, 15, 0).unwrap()
    );
    assert!(state.notification_enabled);
}

#[test]
fn invalid_settings_leave_the_form_untouched() {
    let mut state = SettingsState::default();
    let before = state.clone();
    let result = SettingsChanges {
        theme: Some("dark".to_string()),
        accent: Some("magenta".to_string()),
        ..SettingsChanges::default()
    }
    .apply(&mut state);

    assert!(matches!(result, Err(CliError::InvalidArgument(_))));
    assert_eq!(state, before);
}

#[test]
fn mask_keeps_a_short_prefix() {
    assert_eq!(mask("abc"), "****");
    assert_eq!(mask("eyJhbGciOiJIUzI1NiJ9"), "eyJh****");
}

#[test]
fn completions_use_binary_name() {
    let script = String::from_utf8(completion_script(CompletionShell::Bash)).unwrap();
    assert!(script.contains("quotevault"));
}

#[tokio::test(flavor = "multi_thread")]
async fn open_mirror_creates_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("mirror.db");

    let mirror = open_mirror(Some(&path)).await.unwrap();

    assert_eq!(mirror.path(), Some(path.as_path()));
    assert!(path.exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn open_mirror_failure_is_reported_with_path() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();
    let path = blocker.join("mirror.db");

    let Err(error) = open_mirror(Some(&path)).await else {
        panic!("expected failure");
    };
    assert!(matches!(error, CliError::MirrorUnavailable { .. }));
    assert!(error.to_string().contains("mirror.db"));
}
