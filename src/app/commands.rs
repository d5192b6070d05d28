//! User slash-command parser.
//!
//! Parses `/command arg1 arg2 ...` input lines into typed [`ParsedCommand`]
//! values that the event handler can act on. Item commands (`/rename`,
//! `/move`, `/target`, `/delete`, `/stats qr`, `/pages delete`) carry no id;
//! they apply to whatever row is selected.

use crate::api::models::{QrFilter, QrType};
use crate::app::notifications::NotificationId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DismissTarget {
    Newest,
    All,
    Id(NotificationId),
}

/// A parsed user command. Each variant corresponds to a `/command`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCommand {
    Login { email: String, password: String },
    Signup { email: String, password: String, name: String },
    Logout,
    Theme { name: String },
    Refresh,
    Filter(QrFilter),
    New { qr_type: QrType, payload: String, name: Option<String> },
    Rename { name: String },
    Move { folder: String },
    Target { url: String },
    Delete,
    Stats,
    StatsQr,
    Pages,
    PagesDelete,
    Dismiss(DismissTarget),
    Help,
    Quit,
}

/// Command names offered by tab completion.
pub const COMMANDS: &[&str] = &[
    "login", "signup", "logout", "theme", "refresh", "filter", "new", "rename", "move", "target",
    "delete", "stats", "pages", "dismiss", "help", "quit",
];

/// Parse a slash-command string into a [`ParsedCommand`].
///
/// Returns `None` if the input does not start with `/`, is not a recognized
/// command, or is missing a required argument. Command names are
/// case-insensitive.
pub fn parse_command(input: &str) -> Option<ParsedCommand> {
    let input = input.trim();
    let body = input.strip_prefix('/')?;

    let mut head = body.splitn(2, ' ');
    let cmd = head.next()?.to_lowercase();
    let rest = head.next().map(str::trim).unwrap_or("");

    match cmd.as_str() {
        "login" => {
            let mut args = rest.split_whitespace();
            let email = args.next()?.to_string();
            let password = args.next()?.to_string();
            Some(ParsedCommand::Login { email, password })
        }
        "signup" | "register" => {
            let mut args = rest.splitn(3, ' ');
            let email = non_empty(args.next())?;
            let password = non_empty(args.next())?;
            let name = non_empty(args.next())?;
            Some(ParsedCommand::Signup { email, password, name })
        }
        "logout" => Some(ParsedCommand::Logout),
        "theme" => {
            let name = non_empty(Some(rest))?.to_lowercase();
            Some(ParsedCommand::Theme { name })
        }
        "refresh" | "r" => Some(ParsedCommand::Refresh),
        "filter" => parse_filter(rest).map(ParsedCommand::Filter),
        "new" | "create" => {
            let mut args = rest.splitn(3, ' ');
            let qr_type = QrType::parse(args.next()?)?;
            let payload = non_empty(args.next())?;
            let name = non_empty(args.next());
            Some(ParsedCommand::New { qr_type, payload, name })
        }
        "rename" => Some(ParsedCommand::Rename {
            name: non_empty(Some(rest))?,
        }),
        "move" => Some(ParsedCommand::Move {
            folder: non_empty(Some(rest))?,
        }),
        "target" => Some(ParsedCommand::Target {
            url: non_empty(Some(rest))?,
        }),
        "delete" | "rm" => Some(ParsedCommand::Delete),
        "stats" => match rest.to_lowercase().as_str() {
            "" | "dashboard" => Some(ParsedCommand::Stats),
            "qr" => Some(ParsedCommand::StatsQr),
            _ => None,
        },
        "pages" => match rest.to_lowercase().as_str() {
            "" | "list" => Some(ParsedCommand::Pages),
            "delete" | "rm" => Some(ParsedCommand::PagesDelete),
            _ => None,
        },
        "dismiss" => {
            let target = match rest.to_lowercase().as_str() {
                "" => DismissTarget::Newest,
                "all" => DismissTarget::All,
                id => DismissTarget::Id(NotificationId(id.parse().ok()?)),
            };
            Some(ParsedCommand::Dismiss(target))
        }
        "help" | "h" => Some(ParsedCommand::Help),
        "quit" | "exit" | "q" => Some(ParsedCommand::Quit),
        _ => None,
    }
}

fn non_empty(arg: Option<&str>) -> Option<String> {
    let arg = arg?.trim();
    if arg.is_empty() {
        None
    } else {
        Some(arg.to_string())
    }
}

/// `folder=<name>` and `type=<static|dynamic>` in any order; `clear` (or no
/// arguments) resets the filter.
fn parse_filter(args: &str) -> Option<QrFilter> {
    let mut filter = QrFilter::default();
    if args.eq_ignore_ascii_case("clear") {
        return Some(filter);
    }
    for arg in args.split_whitespace() {
        let (key, value) = arg.split_once('=')?;
        match key.to_lowercase().as_str() {
            "folder" if !value.is_empty() => filter.folder = Some(value.to_string()),
            "type" => filter.qr_type = Some(QrType::parse(value)?),
            _ => return None,
        }
    }
    Some(filter)
}
