/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::env;

use log::{debug, error, warn};
use serde::Serialize;
use thoughtmarks_core::{AccessibilityProps, ThemeGroup};

use crate::app::ShellApp;
use crate::persistence::RedbEnvironmentStorage;
use crate::prefs::{
    ArgumentParsingResult, ENV_DATA_DIR, ENV_DEV_MODE, ENV_LOG, ENV_USE_NEXTGEN, EnvAction,
    RoleAction, ShellArgs, ShellCommand, ShellConfig, parse_command_line_arguments,
};
use crate::registries::atomic::diagnostics::apply_channel_configs;
use crate::registries::domain::accessibility::RoleValidator;
use crate::shell::desktop::runtime::diagnostics::{DiagnosticEvent, DiagnosticsState, emit_event};
use crate::shell::desktop::runtime::environment::EnvironmentToggleResult;
use crate::shell::desktop::runtime::registries::CHANNEL_STARTUP_CONFIG_SNAPSHOT;

pub fn main() {
    // Skip the first argument, which is the binary name.
    let args: Vec<String> = env::args().skip(1).collect();
    let args = match parse_command_line_arguments(&args) {
        ArgumentParsingResult::Run(args) => args,
        ArgumentParsingResult::Exit => std::process::exit(0),
        ArgumentParsingResult::ErrorParsing => std::process::exit(1),
    };

    crate::init_tracing(args.log_filter.as_deref());

    let mut config = match ShellConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };
    config.apply_env_overrides();

    let mut diagnostics = DiagnosticsState::new();
    apply_channel_configs(config.diagnostics.channels.clone());
    emit_startup_env_snapshot();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to start async runtime: {e}");
            std::process::exit(1);
        }
    };

    let outcome = runtime.block_on(run(args, config));

    diagnostics.drain();
    debug!("diagnostics: {}", diagnostics.snapshot_json());

    if let Err(message) = outcome {
        error!("{message}");
        std::process::exit(1);
    }
}

async fn run(args: ShellArgs, config: ShellConfig) -> Result<(), String> {
    match args.command {
        ShellCommand::Env { action } => run_env(action, config).await,
        ShellCommand::Role { action } => run_role(action),
        ShellCommand::Render { mode, page } => {
            let mut app = open_app(config)?;
            let stored = app.boot().await;
            let root = app.render_mode(mode.unwrap_or(stored), page.as_deref());
            print_json(root)
        }
    }
}

fn open_app(config: ShellConfig) -> Result<ShellApp<RedbEnvironmentStorage>, String> {
    ShellApp::open(config).map_err(|e| format!("Failed to open environment storage: {e}"))
}

async fn run_env(action: EnvAction, config: ShellConfig) -> Result<(), String> {
    let app = open_app(config)?;
    app.boot().await;
    let store = app.store();

    let (result, json) = match action {
        EnvAction::Show { json } => {
            let status = store.status().await;
            if json {
                return print_json(&status);
            }
            println!("{}", status.current);
            return Ok(());
        }
        EnvAction::Toggle { json } => (store.toggle().await, json),
        EnvAction::Set { json, mode } => (store.set(mode).await, json),
        EnvAction::Reset { json } => (store.reset().await, json),
    };

    if json {
        print_json(&result)?;
    } else {
        println!("{}", describe(&result));
    }
    match result.error {
        Some(message) if !result.success => Err(format!("Environment change failed: {message}")),
        _ => Ok(()),
    }
}

fn describe(result: &EnvironmentToggleResult) -> String {
    if !result.success {
        return format!("{} (unchanged)", result.current_environment);
    }
    if !result.changed {
        return format!("{} (already active)", result.current_environment);
    }
    format!(
        "{} -> {} ({:?})",
        result.previous_environment, result.current_environment, result.duration
    )
}

fn run_role(action: RoleAction) -> Result<(), String> {
    let validator = RoleValidator::default();
    match action {
        RoleAction::List { group } => {
            let roles = match group {
                Some(name) => {
                    let group = ThemeGroup::from_name(&name)
                        .ok_or_else(|| format!("unknown theme group '{name}'"))?;
                    validator.roles().roles_in_theme_group(group)
                }
                None => validator
                    .roles()
                    .definitions()
                    .into_iter()
                    .map(|definition| definition.role)
                    .collect(),
            };
            for role in roles {
                println!(
                    "{}\t{}\t{}\t{}",
                    role.name(),
                    role.group(),
                    role.theme_group(),
                    role.accessibility_role()
                );
            }
            Ok(())
        }
        RoleAction::Validate {
            label,
            a11y_role,
            accessible,
            role,
        } => {
            let props = AccessibilityProps {
                accessibility_label: label,
                accessibility_role: a11y_role,
                accessible: accessible.then_some(true),
                accessibility_hint: None,
            };
            let result = validator.validate(&role, &props);
            validator.report(&role, &result);
            print_json(&result)?;
            if result.is_valid {
                Ok(())
            } else {
                Err(format!("role '{role}' failed validation"))
            }
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value).map_err(|e| format!("{e}"))?;
    println!("{text}");
    Ok(())
}

fn emit_startup_env_snapshot() {
    let keys: Vec<&str> = [ENV_DATA_DIR, ENV_USE_NEXTGEN, ENV_DEV_MODE, ENV_LOG]
        .into_iter()
        .filter(|key| env::var_os(key).is_some())
        .collect();
    if keys.is_empty() {
        return;
    }
    if env::var_os(ENV_USE_NEXTGEN).is_some() {
        warn!("{ENV_USE_NEXTGEN} only seeds the environment until stored state is hydrated");
    }
    emit_event(DiagnosticEvent::MessageSent {
        channel_id: CHANNEL_STARTUP_CONFIG_SNAPSHOT,
        byte_len: keys.join(",").len(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use thoughtmarks_core::EnvironmentMode;

    fn result(success: bool, changed: bool) -> EnvironmentToggleResult {
        EnvironmentToggleResult {
            success,
            previous_environment: EnvironmentMode::Legacy,
            current_environment: if changed {
                EnvironmentMode::Nextgen
            } else {
                EnvironmentMode::Legacy
            },
            changed,
            error: (!success).then(|| "injected failure: write refused".to_string()),
            duration: Duration::from_millis(3),
        }
    }

    #[test]
    fn describe_covers_each_outcome() {
        assert_eq!(describe(&result(true, true)), "legacy -> nextgen (3ms)");
        assert_eq!(describe(&result(true, false)), "legacy (already active)");
        assert_eq!(describe(&result(false, false)), "legacy (unchanged)");
    }

    #[test]
    fn role_list_rejects_unknown_group() {
        let err = run_role(RoleAction::List {
            group: Some("sparkles".to_string()),
        })
        .unwrap_err();
        assert!(err.contains("sparkles"));
    }

    #[test]
    fn role_validate_fails_for_incomplete_interactive_props() {
        let outcome = run_role(RoleAction::Validate {
            label: None,
            a11y_role: Some("button".to_string()),
            accessible: true,
            role: "button-action".to_string(),
        });
        assert!(outcome.is_err());

        let outcome = run_role(RoleAction::Validate {
            label: Some("Save".to_string()),
            a11y_role: Some("button".to_string()),
            accessible: true,
            role: "button-action".to_string(),
        });
        assert!(outcome.is_ok());
    }
}
