//! Chat command parsing and help text.
//!
//! The bridge forwards raw message text; this module turns it into a typed
//! [`Command`] so every handler works on validated arguments.

use crate::{
    lobby::{InhouseMode, UserId},
    wallet::Side,
};
use serde::Serialize;
use thiserror::Error;

/// Command parsing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Arguments missing or malformed; carries the usage line
    #[error("Usage: {0}")]
    Usage(String),

    /// No such command
    #[error("Unknown command: {0}")]
    Unknown(String),

    /// `help` was given a category other than `admin`
    #[error("Unknown help category. Try `{prefix}help` or `{prefix}help admin`.")]
    UnknownHelpCategory { prefix: String },
}

/// Result type for command parsing
pub type CommandResult<T> = Result<T, CommandError>;

/// Help page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HelpCategory {
    General,
    Admin,
}

/// Parsed chat command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    /// Link a Steam account, optionally for another user
    Cfg {
        steam_id: String,
        target: Option<UserId>,
    },
    Mmr {
        target: Option<UserId>,
    },
    InhouseMmr {
        target: Option<UserId>,
    },
    Leaderboard,
    Bet {
        amount: i64,
        side: Side,
    },
    Balance {
        target: Option<UserId>,
    },
    Add {
        users: Vec<UserId>,
    },
    Remove {
        users: Vec<UserId>,
    },
    /// Show the lobby; a mode argument switches modes first
    Lobby {
        mode: Option<InhouseMode>,
    },
    Reset,
    SetMmr {
        mmr: i64,
        target: UserId,
    },
    Alert,
    SetPassword {
        password: String,
    },
    ChangePrefix {
        prefix: String,
    },
    ViewLogs {
        verbose: bool,
    },
    SubmitMatch {
        match_id: String,
    },
    BindLeague {
        league_id: String,
    },
    SetLiveChannel,
    Help {
        category: HelpCategory,
    },
}

impl Command {
    /// Parse a chat message
    ///
    /// # Arguments
    ///
    /// * `prefix` - Guild's command prefix
    /// * `text` - Raw message text
    ///
    /// # Returns
    ///
    /// * `CommandResult<Option<Command>>` - `None` when the text is not a command
    ///
    /// # Errors
    ///
    /// * `CommandError::Usage` - Arguments are missing or malformed
    /// * `CommandError::Unknown` - Command name is not recognized
    pub fn parse(prefix: &str, text: &str) -> CommandResult<Option<Command>> {
        let Some(body) = text.trim_start().strip_prefix(prefix) else {
            return Ok(None);
        };

        let body = body.trim();
        let (name, rest) = match body.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (body, ""),
        };
        if name.is_empty() {
            return Ok(None);
        }

        let args: Vec<&str> = rest.split_whitespace().collect();
        let usage = |line: &str| CommandError::Usage(line.replace("{p}", prefix));

        let command = match name.to_lowercase().as_str() {
            "cfg" => match args.as_slice() {
                [steam_id] => Command::Cfg {
                    steam_id: steam_id.to_string(),
                    target: None,
                },
                [steam_id, mention] => Command::Cfg {
                    steam_id: steam_id.to_string(),
                    target: Some(
                        parse_mention(mention).ok_or_else(|| usage(USAGE_CFG))?,
                    ),
                },
                _ => return Err(usage(USAGE_CFG)),
            },
            "mmr" => Command::Mmr {
                target: optional_mention(&args).ok_or_else(|| usage(USAGE_MMR))?,
            },
            "inhouse_mmr" => Command::InhouseMmr {
                target: optional_mention(&args).ok_or_else(|| usage(USAGE_INHOUSE_MMR))?,
            },
            "leaderboard" => Command::Leaderboard,
            "bet" => match args.as_slice() {
                [amount, side] => Command::Bet {
                    amount: amount.parse().map_err(|_| usage(USAGE_BET))?,
                    side: side.parse().map_err(|_| usage(USAGE_BET))?,
                },
                _ => return Err(usage(USAGE_BET)),
            },
            "balance" => Command::Balance {
                target: optional_mention(&args).ok_or_else(|| usage(USAGE_BALANCE))?,
            },
            "add" => Command::Add {
                users: mentions(&args).ok_or_else(|| usage(USAGE_ADD))?,
            },
            "remove" => Command::Remove {
                users: mentions(&args).ok_or_else(|| usage(USAGE_REMOVE))?,
            },
            "lobby" => match args.as_slice() {
                [] => Command::Lobby { mode: None },
                [mode] => Command::Lobby {
                    mode: Some(InhouseMode::parse_lenient(mode)),
                },
                _ => return Err(usage(USAGE_LOBBY)),
            },
            "reset" => {
                if !args.is_empty() {
                    return Err(usage(USAGE_RESET));
                }
                Command::Reset
            }
            "setmmr" => match args.as_slice() {
                [mmr, mention] => Command::SetMmr {
                    mmr: mmr.parse().map_err(|_| usage(USAGE_SETMMR))?,
                    target: parse_mention(mention).ok_or_else(|| usage(USAGE_SETMMR))?,
                },
                _ => return Err(usage(USAGE_SETMMR)),
            },
            "alert" => Command::Alert,
            "setpassword" => {
                if rest.is_empty() {
                    return Err(usage(USAGE_SETPASSWORD));
                }
                Command::SetPassword {
                    password: rest.to_string(),
                }
            }
            "changeprefix" => match args.as_slice() {
                [prefix] => Command::ChangePrefix {
                    prefix: prefix.to_string(),
                },
                _ => return Err(usage(USAGE_CHANGEPREFIX)),
            },
            "viewlogs" => Command::ViewLogs {
                verbose: rest.to_lowercase().contains("--verbose"),
            },
            "submitmatch" => match args.as_slice() {
                [match_id] => Command::SubmitMatch {
                    match_id: match_id.to_string(),
                },
                _ => return Err(usage(USAGE_SUBMITMATCH)),
            },
            "bindleague" => match args.as_slice() {
                [league_id] => Command::BindLeague {
                    league_id: league_id.to_string(),
                },
                _ => return Err(usage(USAGE_BINDLEAGUE)),
            },
            "setlivechannel" => Command::SetLiveChannel,
            "help" => match rest.to_lowercase().as_str() {
                "" => Command::Help {
                    category: HelpCategory::General,
                },
                "admin" => Command::Help {
                    category: HelpCategory::Admin,
                },
                _ => {
                    return Err(CommandError::UnknownHelpCategory {
                        prefix: prefix.to_string(),
                    });
                }
            },
            other => return Err(CommandError::Unknown(other.to_string())),
        };

        Ok(Some(command))
    }

    /// Whether `invoker` needs admin rights to run this command
    pub fn requires_admin(&self, invoker: UserId) -> bool {
        match self {
            Command::Cfg { target, .. } => target.is_some_and(|target| target != invoker),
            Command::Lobby { mode } => mode.is_some(),
            Command::SetMmr { .. }
            | Command::Alert
            | Command::SetPassword { .. }
            | Command::ChangePrefix { .. }
            | Command::ViewLogs { .. }
            | Command::SubmitMatch { .. }
            | Command::BindLeague { .. }
            | Command::SetLiveChannel => true,
            _ => false,
        }
    }

    /// Command name as typed after the prefix
    pub fn name(&self) -> &'static str {
        match self {
            Command::Cfg { .. } => "cfg",
            Command::Mmr { .. } => "mmr",
            Command::InhouseMmr { .. } => "inhouse_mmr",
            Command::Leaderboard => "leaderboard",
            Command::Bet { .. } => "bet",
            Command::Balance { .. } => "balance",
            Command::Add { .. } => "add",
            Command::Remove { .. } => "remove",
            Command::Lobby { .. } => "lobby",
            Command::Reset => "reset",
            Command::SetMmr { .. } => "setmmr",
            Command::Alert => "alert",
            Command::SetPassword { .. } => "setpassword",
            Command::ChangePrefix { .. } => "changeprefix",
            Command::ViewLogs { .. } => "viewlogs",
            Command::SubmitMatch { .. } => "submitmatch",
            Command::BindLeague { .. } => "bindleague",
            Command::SetLiveChannel => "setlivechannel",
            Command::Help { .. } => "help",
        }
    }
}

const USAGE_CFG: &str = "`{p}cfg <steam_id>` (optional: `@user`)";
const USAGE_MMR: &str = "`{p}mmr` (optional: `@user`)";
const USAGE_INHOUSE_MMR: &str = "`{p}inhouse_mmr` (optional: `@user`)";
const USAGE_BET: &str = "`{p}bet <amount> <radiant|dire>`";
const USAGE_BALANCE: &str = "`{p}balance` (optional: `@user`)";
const USAGE_ADD: &str = "`{p}add @player1 [@player2 ...]`";
const USAGE_REMOVE: &str = "`{p}remove @player1 [@player2 ...]`";
const USAGE_LOBBY: &str = "`{p}lobby [regular|immortal]`";
const USAGE_RESET: &str = "`{p}reset` (no extra arguments allowed)";
const USAGE_SETMMR: &str = "`{p}setmmr <mmr> @user`";
const USAGE_SETPASSWORD: &str = "`{p}setpassword <new_password>`";
const USAGE_CHANGEPREFIX: &str = "`{p}changeprefix <new_prefix>`";
const USAGE_SUBMITMATCH: &str = "`{p}submitmatch <match_id>`";
const USAGE_BINDLEAGUE: &str = "`{p}bindleague <league_id>`";

/// Parse a `<@id>` or `<@!id>` mention
pub fn parse_mention(token: &str) -> Option<UserId> {
    let inner = token.strip_prefix("<@")?.strip_suffix('>')?;
    let digits = inner.strip_prefix('!').unwrap_or(inner);
    digits.parse().ok()
}

/// Zero or one mention; `None` when the argument is not a mention
fn optional_mention(args: &[&str]) -> Option<Option<UserId>> {
    match args {
        [] => Some(None),
        [mention] => parse_mention(mention).map(Some),
        _ => None,
    }
}

/// One or more mentions; `None` when empty or any argument is not a mention
fn mentions(args: &[&str]) -> Option<Vec<UserId>> {
    if args.is_empty() {
        return None;
    }
    args.iter().map(|arg| parse_mention(arg)).collect()
}

/// Help text for a category, written with the guild's prefix
pub fn help_text(prefix: &str, category: HelpCategory) -> String {
    let text = match category {
        HelpCategory::General => GENERAL_HELP,
        HelpCategory::Admin => ADMIN_HELP,
    };
    text.replace("{p}", prefix)
}

const GENERAL_HELP: &str = "\
**Available Commands:**

__**General Commands**__
**{p}cfg `steam_id` `@user`** - Link your Steam ID to fetch your MMR from STRATZ.
**{p}mmr `@user`** - Show your MMR or another user's MMR.
**{p}inhouse_mmr `@user`** - Show inhouse MMR for yourself or another user
**{p}balance `@user`** - Show your or another user's coin balance
**{p}leaderboard** - View top 10 inhouse MMR players in this server

__**Lobby Management**__
**{p}add `@user1` `@user2` ...** - Manually add one or more users to the lobby.
**{p}remove `@user1` `@user2` ...** - Manually remove one or more users from the lobby.
**{p}lobby** - Create or refresh the inhouse lobby.
**{p}reset** - Clear the current lobby and start fresh.

__**Betting Commands**__
**{p}bet `amt` `radiant|dire`** - Bet coins on the current inhouse match
**{p}balance `@user`** - Show your or another user's coin balance

__**Admin Commands**__
Use `{p}help admin` to see the list of admin-only commands.
";

const ADMIN_HELP: &str = "\
__**Admin Commands**__
**{p}lobby `mode`** - (Admin only) Sets the lobby mode for the inhouse
Modes: • `regular` - Regular Captain's Mode (MMR-balanced teams)
           • `immortal` - Captain's Mode with Immortal Draft (captains pick teams)
**{p}setmmr `mmr` `@user`** - (Admin only) Manually set a user's MMR.
**{p}setpassword `new_password`** - (Admin only) Change the inhouse lobby password.
**{p}changeprefix `new_prefix`** - (Admin only) Changes the prefix of the bot commands.
**{p}submitmatch `match_id`** - (Admin only) Report match and resolve MMR + bets
**{p}alert** - (Admin only) Mention all 10 players when the lobby is full.
**{p}viewlogs** - (Admin only) View recent lobby config logs.
**{p}viewlogs --verbose** - (Admin only) View full detailed logs for this server.
**{p}bindleague `league_id`** - (Admin only) Binds a Steam league ID to this server for live match tracking.
**{p}setlivechannel** - (Admin only) Sets the current text channel as the destination for live match updates.
";

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> CommandResult<Option<Command>> {
        Command::parse("!", text)
    }

    #[test]
    fn test_non_command_text() {
        assert_eq!(parse("hello there"), Ok(None));
        assert_eq!(parse("!"), Ok(None));
        assert_eq!(Command::parse("?", "!lobby"), Ok(None));
    }

    #[test]
    fn test_mentions() {
        assert_eq!(parse_mention("<@123>"), Some(123));
        assert_eq!(parse_mention("<@!456>"), Some(456));
        assert_eq!(parse_mention("@someone"), None);
        assert_eq!(parse_mention("<@abc>"), None);
    }

    #[test]
    fn test_cfg() {
        assert_eq!(
            parse("!cfg 76561198000000000"),
            Ok(Some(Command::Cfg {
                steam_id: "76561198000000000".into(),
                target: None
            }))
        );
        assert_eq!(
            parse("!cfg 1234 <@!9>"),
            Ok(Some(Command::Cfg {
                steam_id: "1234".into(),
                target: Some(9)
            }))
        );
        assert!(matches!(parse("!cfg"), Err(CommandError::Usage(_))));
    }

    #[test]
    fn test_lookups() {
        assert_eq!(parse("!mmr"), Ok(Some(Command::Mmr { target: None })));
        assert_eq!(
            parse("!inhouse_mmr <@5>"),
            Ok(Some(Command::InhouseMmr { target: Some(5) }))
        );
        assert_eq!(
            parse("!balance <@5>"),
            Ok(Some(Command::Balance { target: Some(5) }))
        );
        assert_eq!(parse("!leaderboard"), Ok(Some(Command::Leaderboard)));
        assert!(matches!(parse("!mmr bob"), Err(CommandError::Usage(_))));
    }

    #[test]
    fn test_bet() {
        assert_eq!(
            parse("!bet 250 Radiant"),
            Ok(Some(Command::Bet {
                amount: 250,
                side: Side::Radiant
            }))
        );
        assert!(matches!(parse("!bet lots dire"), Err(CommandError::Usage(_))));
        assert!(matches!(parse("!bet 10 sentinel"), Err(CommandError::Usage(_))));
        assert!(matches!(parse("!bet 10"), Err(CommandError::Usage(_))));
    }

    #[test]
    fn test_add_and_remove() {
        assert_eq!(
            parse("!add <@1> <@!2>"),
            Ok(Some(Command::Add { users: vec![1, 2] }))
        );
        assert_eq!(
            parse("!remove <@3>"),
            Ok(Some(Command::Remove { users: vec![3] }))
        );
        assert_eq!(
            parse("!add"),
            Err(CommandError::Usage("`!add @player1 [@player2 ...]`".into()))
        );
        assert!(matches!(parse("!remove <@3> bob"), Err(CommandError::Usage(_))));
    }

    #[test]
    fn test_lobby_mode_falls_back_to_regular() {
        assert_eq!(parse("!lobby"), Ok(Some(Command::Lobby { mode: None })));
        assert_eq!(
            parse("!lobby IMMORTAL"),
            Ok(Some(Command::Lobby {
                mode: Some(InhouseMode::Immortal)
            }))
        );
        assert_eq!(
            parse("!lobby turbo"),
            Ok(Some(Command::Lobby {
                mode: Some(InhouseMode::Regular)
            }))
        );
    }

    #[test]
    fn test_reset_takes_no_arguments() {
        assert_eq!(parse("!reset"), Ok(Some(Command::Reset)));
        assert!(matches!(parse("!reset now"), Err(CommandError::Usage(_))));
    }

    #[test]
    fn test_admin_commands() {
        assert_eq!(
            parse("!setmmr 4000 <@8>"),
            Ok(Some(Command::SetMmr {
                mmr: 4000,
                target: 8
            }))
        );
        assert_eq!(
            parse("!setpassword open sesame"),
            Ok(Some(Command::SetPassword {
                password: "open sesame".into()
            }))
        );
        assert_eq!(
            parse("!changeprefix ?"),
            Ok(Some(Command::ChangePrefix { prefix: "?".into() }))
        );
        assert_eq!(
            parse("!viewlogs --VERBOSE"),
            Ok(Some(Command::ViewLogs { verbose: true }))
        );
        assert_eq!(
            parse("!submitmatch 8351234567"),
            Ok(Some(Command::SubmitMatch {
                match_id: "8351234567".into()
            }))
        );
        assert_eq!(
            parse("!bindleague 15728"),
            Ok(Some(Command::BindLeague {
                league_id: "15728".into()
            }))
        );
        assert_eq!(parse("!setlivechannel"), Ok(Some(Command::SetLiveChannel)));
        assert_eq!(parse("!alert"), Ok(Some(Command::Alert)));
        assert!(matches!(parse("!setpassword"), Err(CommandError::Usage(_))));
        assert!(matches!(parse("!setmmr <@8>"), Err(CommandError::Usage(_))));
    }

    #[test]
    fn test_custom_prefix_and_case() {
        assert_eq!(
            Command::parse("$$", "$$LOBBY"),
            Ok(Some(Command::Lobby { mode: None }))
        );
        assert_eq!(
            Command::parse("?", "?bet 5"),
            Err(CommandError::Usage("`?bet <amount> <radiant|dire>`".into()))
        );
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(
            parse("!dance"),
            Err(CommandError::Unknown("dance".into()))
        );
    }

    #[test]
    fn test_help() {
        assert_eq!(
            parse("!help"),
            Ok(Some(Command::Help {
                category: HelpCategory::General
            }))
        );
        assert_eq!(
            parse("!help Admin"),
            Ok(Some(Command::Help {
                category: HelpCategory::Admin
            }))
        );
        let err = parse("!help everything").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown help category. Try `!help` or `!help admin`."
        );
    }

    #[test]
    fn test_requires_admin() {
        let own_cfg = Command::Cfg {
            steam_id: "1".into(),
            target: Some(7),
        };
        assert!(!own_cfg.requires_admin(7));
        assert!(own_cfg.requires_admin(8));

        assert!(!Command::Lobby { mode: None }.requires_admin(1));
        assert!(
            Command::Lobby {
                mode: Some(InhouseMode::Regular)
            }
            .requires_admin(1)
        );
        assert!(Command::Alert.requires_admin(1));
        assert!(!Command::Reset.requires_admin(1));
    }

    #[test]
    fn test_help_text_uses_prefix() {
        let general = help_text("?", HelpCategory::General);
        assert!(general.contains("?cfg"));
        assert!(general.contains("`?help admin`"));
        assert!(!general.contains("{p}"));

        let admin = help_text("!", HelpCategory::Admin);
        assert!(admin.contains("!submitmatch"));
        assert!(!admin.contains("!cfg"));
    }
}
