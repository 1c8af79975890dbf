//! 電影檔名比對重新命名主模組
//!
//! 協調資料集載入、檔案掃描、片名比對、預覽與重新命名的整體流程

use super::dataset_reader::load_records;
use super::error::DatasetError;
use super::filename_normalizer::FilenameNormalizer;
use super::match_resolver::{Choice, ChoiceProvider, MatchResolver};
use super::rename_planner::{RenamePlan, RenameResult, RenameSummary, apply_op, plan};
use super::title_index::TitleIndex;
use super::types::{FileEntry, Record};
use crate::config::Config;
use crate::config::UserSettings;
use crate::config::save::{add_recent_path, save_settings};
use crate::tools::{scan_media_files, validate_directory_exists, validate_extension};
use anyhow::Result;
use console::style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use rust_i18n::t;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::{Duration, Instant};

/// 預覽時每個區塊最多顯示的項目數
const PREVIEW_LIMIT: usize = 20;

/// 電影檔名重新命名器
pub struct MovieRenamer<'a> {
    config: &'a mut Config,
    shutdown_signal: Arc<AtomicBool>,
}

impl<'a> MovieRenamer<'a> {
    pub fn new(config: &'a mut Config, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            config,
            shutdown_signal,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        println!("{}", style(t!("renamer.title")).cyan().bold());

        let directory = self.prompt_directory()?;
        validate_directory_exists(&directory)?;

        let extension = self.prompt_extension()?;
        validate_extension(&extension)?;

        add_recent_path(&mut self.config.settings, &directory.to_string_lossy());
        if let Err(e) = save_settings(&self.config.settings, &self.config.settings_path) {
            warn!("Could not persist recent paths: {e:#}");
        }

        let index = load_title_index(&self.config.settings)?;

        println!("{}", style(t!("renamer.scanning")).dim());
        let entries = scan_entries(&directory, &extension, &self.config.settings)?;
        if entries.is_empty() {
            println!("{}", style(t!("renamer.no_files", ext = extension.as_str())).yellow());
            return Ok(());
        }
        println!(
            "{}",
            style(t!(
                "renamer.found_files",
                count = entries.len(),
                ext = extension.as_str()
            ))
            .green()
        );

        let resolver = MatchResolver::new(&index, self.config.settings.year_policy);
        let mut chooser = ConsoleChooser::new();
        let outcomes = resolver.resolve_all(&entries, &mut chooser, &self.shutdown_signal);
        let rename_plan = plan(&entries, &outcomes);

        self.display_preview(&rename_plan);

        if rename_plan.ops.is_empty() {
            println!("{}", style(t!("renamer.nothing_to_rename")).yellow());
            self.display_summary(&RenameSummary::new(&rename_plan, &[]));
            return Ok(());
        }

        if !self.confirm_rename()? {
            println!("{}", style(t!("renamer.cancelled")).yellow());
            return Ok(());
        }

        let results = self.execute_rename(&rename_plan);
        self.display_failures(&results);

        let summary = RenameSummary::new(&rename_plan, &results);
        self.display_summary(&summary);
        info!(
            "Rename finished - succeeded: {}, failed: {}, unresolved: {}, unchanged: {}",
            summary.succeeded, summary.failed, summary.unresolved, summary.unchanged
        );

        Ok(())
    }

    fn prompt_directory(&self) -> Result<PathBuf> {
        let recent = &self.config.settings.recent_paths;
        if !recent.is_empty() {
            let mut items: Vec<String> = recent.clone();
            items.push(t!("renamer.new_path").to_string());

            let selection = Select::with_theme(&ColorfulTheme::default())
                .with_prompt(t!("renamer.select_directory"))
                .items(&items)
                .default(0)
                .interact()?;
            if let Some(path) = recent.get(selection) {
                return Ok(PathBuf::from(path));
            }
        }

        let path: String = Input::new()
            .with_prompt(t!("renamer.enter_directory"))
            .interact_text()?;
        Ok(PathBuf::from(path.trim()))
    }

    fn prompt_extension(&self) -> Result<String> {
        let default_extension = &self.config.settings.default_extension;
        let mut items: Vec<String> = self.config.file_type_table.video_file.clone();
        let known = self.config.file_type_table.video_extensions_set();
        if !known.contains(&default_extension.to_lowercase()) {
            items.insert(0, default_extension.clone());
        }
        let default_index = items
            .iter()
            .position(|ext| ext.eq_ignore_ascii_case(default_extension))
            .unwrap_or(0);
        items.push(t!("renamer.other_extension").to_string());

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(t!("renamer.extension_prompt"))
            .items(&items)
            .default(default_index)
            .interact()?;

        if selection + 1 < items.len() {
            return Ok(items[selection].clone());
        }

        let extension: String = Input::new()
            .with_prompt(t!("renamer.enter_extension"))
            .validate_with(|input: &String| validate_extension(input.trim()).map_err(|e| e.to_string()))
            .interact_text()?;
        Ok(extension.trim().to_string())
    }

    fn confirm_rename(&self) -> Result<bool> {
        let confirmed = Confirm::new()
            .with_prompt(t!("renamer.confirm"))
            .default(false)
            .interact()?;
        Ok(confirmed)
    }

    fn display_preview(&self, rename_plan: &RenamePlan) {
        println!();
        if !rename_plan.ops.is_empty() {
            println!(
                "{}",
                style(t!("renamer.preview_ops", count = rename_plan.ops.len())).cyan()
            );
            for op in rename_plan.ops.iter().take(PREVIEW_LIMIT) {
                println!("  {} {}", style("→").green(), op);
            }
            print_remaining(rename_plan.ops.len());
            println!();
        }

        if !rename_plan.unchanged.is_empty() {
            println!(
                "{}",
                style(t!(
                    "renamer.preview_unchanged",
                    count = rename_plan.unchanged.len()
                ))
                .dim()
            );
            for name in rename_plan.unchanged.iter().take(PREVIEW_LIMIT) {
                println!("  {} {}", style("✓").dim(), name);
            }
            print_remaining(rename_plan.unchanged.len());
            println!();
        }

        if !rename_plan.unresolved.is_empty() {
            println!(
                "{}",
                style(t!(
                    "renamer.preview_unresolved",
                    count = rename_plan.unresolved.len()
                ))
                .yellow()
            );
            for item in rename_plan.unresolved.iter().take(PREVIEW_LIMIT) {
                println!(
                    "  {} {} {}",
                    style("✗").yellow(),
                    item.file_name,
                    style(format!("({})", item.reason)).dim()
                );
            }
            print_remaining(rename_plan.unresolved.len());
            println!();
        }
    }

    fn execute_rename(&self, rename_plan: &RenamePlan) -> Vec<RenameResult> {
        let progress_bar = ProgressBar::new(rename_plan.ops.len() as u64);
        if let Ok(progress_style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
        {
            progress_bar.set_style(progress_style.progress_chars("#>-"));
        }
        progress_bar.set_message(t!("renamer.renaming").to_string());

        let mut results = Vec::with_capacity(rename_plan.ops.len());
        for op in &rename_plan.ops {
            results.push(apply_op(op));
            progress_bar.inc(1);
        }

        progress_bar.finish_with_message(t!("renamer.done").to_string());
        results
    }

    fn display_failures(&self, results: &[RenameResult]) {
        let failures: Vec<_> = results.iter().filter(|r| !r.is_success()).collect();
        if failures.is_empty() {
            return;
        }
        println!();
        println!("{}", style(t!("renamer.failed_header")).red());
        for result in failures {
            if let Some(error) = &result.error {
                println!("  {} {}: {}", style("✗").red(), result.op, error);
            }
        }
    }

    fn display_summary(&self, summary: &RenameSummary) {
        println!();
        println!("{}", style(t!("renamer.summary_title")).cyan().bold());
        println!(
            "  {} {}",
            t!("renamer.summary_renamed"),
            style(summary.succeeded).green()
        );
        if summary.failed > 0 {
            println!(
                "  {} {}",
                t!("renamer.summary_failed"),
                style(summary.failed).red()
            );
        }
        if summary.unresolved > 0 {
            println!(
                "  {} {}",
                t!("renamer.summary_unresolved"),
                style(summary.unresolved).yellow()
            );
        }
        if summary.unchanged > 0 {
            println!(
                "  {} {}",
                t!("renamer.summary_unchanged"),
                style(summary.unchanged).dim()
            );
        }
    }
}

fn print_remaining(total: usize) {
    if total > PREVIEW_LIMIT {
        println!(
            "  {} {}",
            style("⋯").dim(),
            t!("renamer.more", count = total - PREVIEW_LIMIT)
        );
    }
}

/// 讀取資料集並建立片名索引；失敗時整個流程中止
pub fn load_title_index(settings: &UserSettings) -> Result<TitleIndex, DatasetError> {
    let spinner = ProgressBar::new_spinner();
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(
        t!(
            "renamer.loading_dataset",
            path = settings.dataset_path.display()
        )
        .to_string(),
    );

    let started = Instant::now();
    let records = match load_records(&settings.dataset_path, &settings.title_type) {
        Ok(records) => records,
        Err(e) => {
            spinner.abandon_with_message(t!("renamer.dataset_unavailable").to_string());
            return Err(e);
        }
    };
    let index = TitleIndex::load(records);

    spinner.finish_with_message(
        t!(
            "renamer.indexed",
            titles = index.title_count(),
            records = index.record_count(),
            secs = format!("{:.2}", started.elapsed().as_secs_f64())
        )
        .to_string(),
    );
    info!(
        "Title index ready: {} titles, {} records",
        index.title_count(),
        index.record_count()
    );

    Ok(index)
}

/// 掃描資料夾並正規化每個檔名
pub fn scan_entries(
    directory: &Path,
    extension: &str,
    settings: &UserSettings,
) -> Result<Vec<FileEntry>> {
    let normalizer = FilenameNormalizer::new(settings.year_range);
    let entries: Vec<FileEntry> = scan_media_files(directory, extension)?
        .iter()
        .filter_map(|path| normalizer.file_entry(path))
        .collect();
    info!(
        "Scanned {}: {} matching file(s)",
        directory.display(),
        entries.len()
    );
    Ok(entries)
}

/// 以 dialoguer 選單讓使用者從候選中選擇
pub struct ConsoleChooser {
    theme: ColorfulTheme,
}

impl Default for ConsoleChooser {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleChooser {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl ChoiceProvider for ConsoleChooser {
    fn choose(&mut self, entry: &FileEntry, candidates: &[Record]) -> Result<Choice> {
        println!();
        println!(
            "{} {} {}",
            style(t!("renamer.chooser.multiple_matches")).cyan(),
            style(&entry.original_file_name).bold(),
            style(t!(
                "renamer.chooser.searched",
                title = entry.cleaned_title.as_str()
            ))
            .dim()
        );

        let mut items: Vec<String> = candidates
            .iter()
            .enumerate()
            .map(|(i, record)| format!("[{i}] {record}"))
            .collect();
        items.push(t!("renamer.chooser.skip").to_string());
        items.push(t!("renamer.chooser.stop").to_string());

        let selection = Select::with_theme(&self.theme)
            .with_prompt(t!("renamer.chooser.prompt"))
            .items(&items)
            .default(0)
            .interact_opt()?;

        Ok(match selection {
            Some(index) if index < candidates.len() => Choice::Pick(index),
            Some(index) if index == candidates.len() + 1 => Choice::Abort,
            _ => Choice::Skip,
        })
    }
}
