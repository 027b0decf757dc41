use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::fingerprint;

pub const COMMAND_NAME: &str = "_whitelist";
pub const COMMAND_ALIAS: &str = "_wl";

/// Where a command invocation came from, as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CommandOrigin {
    Player { name: String, operator: bool },
    CommandBlock,
    Server,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WhitelistCommand {
    Info,
    Set { target_player: String },
}

/// Ignored mirrors the host behavior of silently dropping an invocation the
/// origin is not allowed to make.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum CommandOutcome {
    Reply { message: String },
    Ignored,
}

pub fn parse(args: &[String]) -> Result<WhitelistCommand, String> {
    match args {
        [] => Ok(WhitelistCommand::Info),
        [sub] if sub == "info" => Ok(WhitelistCommand::Info),
        [sub, target] if sub == "set" => Ok(WhitelistCommand::Set {
            target_player: target.clone(),
        }),
        _ => Err(format!(
            "Usage: {COMMAND_NAME} [info | set <targetPlayer>] (alias: {COMMAND_ALIAS})"
        )),
    }
}

pub fn dispatch(config: &AppConfig, origin: &CommandOrigin, args: &[String]) -> CommandOutcome {
    let command = match parse(args) {
        Ok(command) => command,
        Err(usage) => return CommandOutcome::Reply { message: usage },
    };

    match command {
        WhitelistCommand::Info => match origin {
            // The info text only goes to an actual player.
            CommandOrigin::Player { .. } => CommandOutcome::Reply {
                message: plugin_info(),
            },
            _ => CommandOutcome::Ignored,
        },
        WhitelistCommand::Set { target_player } => {
            if *origin == CommandOrigin::CommandBlock && !config.permission.enable_commandblock {
                return CommandOutcome::Ignored;
            }

            if let CommandOrigin::Player { operator, .. } = origin {
                if !operator {
                    return CommandOutcome::Ignored;
                }
            }

            // TODO: wire this to PlayerStore::move_status once the intended
            // set semantics (target status and expiry) are confirmed.
            CommandOutcome::Reply {
                message: format!("No changes applied to {target_player}."),
            }
        }
    }
}

pub fn plugin_info() -> String {
    let mut info = format!(
        "Plugin Information: \n\
         \u{a7}a{} \u{a7}rv{}\n\
         \u{a7}rRepository: \u{a7}b{}\n\
         \u{a7}rDeveloper: {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_REPOSITORY"),
        env!("CARGO_PKG_AUTHORS"),
    );

    if let Some(token) = fingerprint::device_token() {
        info.push_str("\n\u{a7}rDevice: \u{a7}7");
        info.push_str(&token);
    }

    info
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    fn player(operator: bool) -> CommandOrigin {
        CommandOrigin::Player {
            name: "Steve".to_string(),
            operator,
        }
    }

    #[test]
    fn bare_invocation_and_info_are_equivalent() {
        assert_eq!(parse(&[]).unwrap(), WhitelistCommand::Info);
        assert_eq!(parse(&args(&["info"])).unwrap(), WhitelistCommand::Info);
    }

    #[test]
    fn unknown_subcommand_replies_with_usage() {
        let outcome = dispatch(&AppConfig::default(), &player(false), &args(&["frobnicate"]));
        match outcome {
            CommandOutcome::Reply { message } => assert!(message.starts_with("Usage:")),
            other => panic!("expected usage reply, got {other:?}"),
        }
    }

    #[test]
    fn info_replies_to_players_only() {
        let config = AppConfig::default();

        match dispatch(&config, &player(false), &[]) {
            CommandOutcome::Reply { message } => assert!(message.contains(env!("CARGO_PKG_VERSION"))),
            other => panic!("expected info reply, got {other:?}"),
        }

        assert_eq!(dispatch(&config, &CommandOrigin::Server, &[]), CommandOutcome::Ignored);
    }

    #[test]
    fn set_from_command_block_is_gated_by_config() {
        let mut config = AppConfig::default();
        let set_args = args(&["set", "Alex"]);

        assert_eq!(
            dispatch(&config, &CommandOrigin::CommandBlock, &set_args),
            CommandOutcome::Ignored
        );

        config.permission.enable_commandblock = true;
        assert!(matches!(
            dispatch(&config, &CommandOrigin::CommandBlock, &set_args),
            CommandOutcome::Reply { .. }
        ));
    }

    #[test]
    fn set_requires_operator_permission() {
        let config = AppConfig::default();
        let set_args = args(&["set", "Alex"]);

        assert_eq!(dispatch(&config, &player(false), &set_args), CommandOutcome::Ignored);
        assert!(matches!(
            dispatch(&config, &player(true), &set_args),
            CommandOutcome::Reply { .. }
        ));
    }
}
