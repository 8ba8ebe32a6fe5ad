use crate::checker::dictionary::{parse_word_list, Dictionary};
use anyhow::{bail, Context, Result};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

// Pinned commit so a download always yields the same word list.
const WORDLIST_BASE_URL: &str =
    "https://raw.githubusercontent.com/dwyl/english-words/6e4bc58ad764c3e6df8b5be4048671962c9d6a23";
const WORDLIST_VERSION: &str = "2023.12";

pub fn wordlist_url(language: &str) -> Result<String> {
    match language {
        "en_US" | "en_GB" => Ok(format!("{}/words_alpha.txt", WORDLIST_BASE_URL)),
        other => bail!(
            "Language '{}' is not supported. Only 'en_US' and 'en_GB' are currently available.",
            other
        ),
    }
}

fn data_dir() -> Result<PathBuf> {
    crate::config::data_dir().context("Failed to get data directory")
}

/// Languages with an installed `.dict` file in `dir`, sorted.
pub fn installed_languages(dir: &Path) -> Result<Vec<String>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut languages = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|s| s.to_str()) == Some("dict") {
            if let Some(language) = path.file_stem().and_then(|s| s.to_str()) {
                languages.push(language.to_string());
            }
        }
    }

    languages.sort();
    Ok(languages)
}

pub fn list_dictionaries() -> Result<()> {
    let data_dir = data_dir()?;
    let languages = installed_languages(&data_dir)?;

    if languages.is_empty() {
        println!("{}", "No dictionaries installed.".yellow());
        println!(
            "The embedded English list is used. Run {} for a full dictionary.",
            "spellrite dict download en_US".cyan()
        );
        return Ok(());
    }

    println!("{}", "Installed dictionaries:".bold());
    println!();

    for language in &languages {
        let size_kb = fs::metadata(data_dir.join(format!("{}.dict", language)))?.len() / 1024;
        println!(
            "  {} {} ({})",
            "✓".green(),
            language.cyan().bold(),
            format!("{}KB", size_kb).dimmed()
        );
    }

    println!();
    println!(
        "Data directory: {}",
        data_dir.display().to_string().dimmed()
    );

    Ok(())
}

pub fn download_dictionary(language: &str) -> Result<()> {
    let wordlist_url = wordlist_url(language)?;

    println!(
        "{} dictionary for {} (version: {})...",
        "Downloading".cyan().bold(),
        language.yellow(),
        WORDLIST_VERSION.dimmed()
    );
    println!("Source: {}", wordlist_url.dimmed());

    let data_dir = data_dir()?;
    fs::create_dir_all(&data_dir).context("Failed to create data directory")?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Downloading...");

    let response =
        reqwest::blocking::get(&wordlist_url).context("Failed to download dictionary")?;

    if !response.status().is_success() {
        pb.finish_and_clear();
        bail!("Failed to download dictionary: HTTP {}", response.status());
    }

    let content = response.text()?;
    pb.finish_with_message("Download complete");

    let words: Vec<&str> = parse_word_list(&content)
        .filter(|word| word.chars().count() > 1)
        .collect();
    println!("Found {} words", words.len().to_string().yellow());

    let dict_path = data_dir.join(format!("{}.dict", language));
    Dictionary::build_from_words(&words, &dict_path)?;

    println!(
        "{} Dictionary installed: {}",
        "✓".green().bold(),
        dict_path.display().to_string().cyan()
    );

    Ok(())
}

pub fn show_info(language: &str) -> Result<()> {
    let dict_path = data_dir()?.join(format!("{}.dict", language));

    if !dict_path.exists() {
        println!(
            "{} Dictionary for {} not found.",
            "✗".red().bold(),
            language.yellow()
        );
        println!(
            "Run {} to download it.",
            format!("spellrite dict download {}", language).cyan()
        );
        return Ok(());
    }

    let metadata = fs::metadata(&dict_path)?;

    println!("{}", format!("Dictionary: {}", language).bold());
    println!("  Path: {}", dict_path.display());
    println!("  Size: {} KB", metadata.len() / 1024);
    println!("  Version: {}", WORDLIST_VERSION);
    println!("  Format: FST (Finite State Transducer)");

    match Dictionary::load_from_path(&dict_path) {
        Ok(dict) => println!("  Words: {}", dict.len()),
        Err(e) => println!("  {}: {:#}", "Error loading dictionary".red(), e),
    }

    Ok(())
}
