use crate::config::save::save_settings;
use crate::config::types::{Config, Language, YearPolicy};
use crate::menu::handlers::run_movie_renamer;
use crate::tools::validate_extension;
use anyhow::Result;
use console::{Term, style};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use rust_i18n::t;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

pub fn show_main_menu(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
) -> Result<bool> {
    term.clear_screen()?;

    println!("{}", style(t!("main_menu.title")).cyan().bold());
    println!("{}", style(t!("common.esc_exit_hint")).dim());

    let options = vec![
        t!("main_menu.opt_rename"),
        t!("main_menu.opt_settings"),
        t!("main_menu.exit"),
    ];

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("main_menu.prompt"))
        .items(&options)
        .default(0)
        .interact_on_opt(term)?;

    match selection {
        Some(0) => {
            run_movie_renamer(term, shutdown_signal, config)?;
            Ok(true)
        }
        Some(1) => {
            show_settings_menu(term, config)?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// 設定選單
fn show_settings_menu(term: &Term, config: &mut Config) -> Result<()> {
    loop {
        term.clear_screen()?;

        println!("{}", style(t!("settings.title")).cyan().bold());
        println!("{}", style(t!("common.esc_hint")).dim());

        let options = vec![
            t!("settings.opt_language", value = config.settings.language),
            t!(
                "settings.opt_dataset_path",
                value = config.settings.dataset_path.display()
            ),
            t!(
                "settings.opt_default_extension",
                value = config.settings.default_extension.as_str()
            ),
            t!("settings.opt_year_policy", value = config.settings.year_policy),
            t!("common.back"),
        ];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(t!("settings.prompt"))
            .items(&options)
            .default(0)
            .interact_on_opt(term)?;

        match selection {
            Some(0) => show_language_menu(term, config)?,
            Some(1) => edit_dataset_path(config)?,
            Some(2) => edit_default_extension(config)?,
            Some(3) => show_year_policy_menu(term, config)?,
            _ => break,
        }
    }

    Ok(())
}

/// 語言設定選單
fn show_language_menu(term: &Term, config: &mut Config) -> Result<()> {
    term.clear_screen()?;

    println!("{}", style(t!("settings.language.title")).cyan().bold());
    println!("{}", style(t!("common.esc_hint")).dim());

    let languages = [Language::EnUs, Language::ZhTw];
    let items: Vec<String> = languages.iter().map(ToString::to_string).collect();

    let default_index = languages
        .iter()
        .position(|&l| l == config.settings.language)
        .unwrap_or(0);

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("settings.language.prompt"))
        .items(&items)
        .default(default_index)
        .interact_on_opt(term)?;

    let Some(selection) = selection else {
        return Ok(());
    };

    let selected = languages[selection];
    if selected != config.settings.language {
        config.settings.language = selected;
        rust_i18n::set_locale(selected.as_str());
        save_settings(&config.settings, &config.settings_path)?;
        print_saved(&selected.to_string());
    }

    Ok(())
}

fn edit_dataset_path(config: &mut Config) -> Result<()> {
    let path: String = Input::new()
        .with_prompt(t!("settings.dataset_path_prompt"))
        .with_initial_text(config.settings.dataset_path.to_string_lossy())
        .interact_text()?;

    let path = PathBuf::from(path.trim());
    if path != config.settings.dataset_path {
        config.settings.dataset_path = path;
        save_settings(&config.settings, &config.settings_path)?;
        print_saved(&config.settings.dataset_path.display().to_string());
    }
    Ok(())
}

fn edit_default_extension(config: &mut Config) -> Result<()> {
    let extension: String = Input::new()
        .with_prompt(t!("settings.default_extension_prompt"))
        .with_initial_text(config.settings.default_extension.as_str())
        .validate_with(|input: &String| {
            validate_extension(input.trim()).map_err(|e| e.to_string())
        })
        .interact_text()?;

    let extension = extension.trim().to_string();
    if extension != config.settings.default_extension {
        config.settings.default_extension = extension;
        save_settings(&config.settings, &config.settings_path)?;
        print_saved(&config.settings.default_extension);
    }
    Ok(())
}

/// 年份策略選單
fn show_year_policy_menu(term: &Term, config: &mut Config) -> Result<()> {
    term.clear_screen()?;

    println!("{}", style(t!("settings.year_policy.title")).cyan().bold());
    println!("{}", style(t!("common.esc_hint")).dim());
    println!("\n{}", style(t!("settings.year_policy.hint")).dim());
    println!();

    let policies = [YearPolicy::PreferFilenameYear, YearPolicy::AlwaysAsk];
    let items: Vec<String> = policies.iter().map(ToString::to_string).collect();

    let default_index = policies
        .iter()
        .position(|&p| p == config.settings.year_policy)
        .unwrap_or(0);

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("settings.year_policy.prompt"))
        .items(&items)
        .default(default_index)
        .interact_on_opt(term)?;

    let Some(selection) = selection else {
        return Ok(());
    };

    let selected = policies[selection];
    if selected != config.settings.year_policy {
        config.settings.year_policy = selected;
        save_settings(&config.settings, &config.settings_path)?;
        print_saved(&selected.to_string());
    }

    Ok(())
}

fn print_saved(value: &str) {
    println!("\n{} {}", style(t!("common.saved")).green(), value);
    std::thread::sleep(std::time::Duration::from_secs(1));
}
