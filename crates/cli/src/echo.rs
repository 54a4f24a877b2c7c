use batcave_core::{CategoryFacet, ChapterImages, ComicDetail, FolderList, Item, PageResult, Section, SortOption};
use owo_colors::OwoColorize;

use crate::VERSION;

/// Print a styled banner for verbose mode
pub fn print_banner() {
    eprintln!("\n{} {} {}", "BatCave".bold().bright_blue(), "v".dimmed(), VERSION.dimmed());
    eprintln!("{}", "Browse the batcave.biz comic catalog\n".dimmed());
}

/// Print a styled step message
pub fn print_step(step: usize, total: usize, message: &str) {
    eprintln!("{} {}", format!("[{}/{}]", step, total).dimmed(), message.bright_cyan());
}

/// Print a success message
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message.bright_green());
}

/// Print an info message
pub fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue(), message.bright_blue());
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message.bright_yellow());
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message.bright_red());
}

/// Print timing information with color coding
pub fn print_timing(label: &str, duration: std::time::Duration) {
    let ms = duration.as_secs_f64() * 1000.0;
    let label = format!("{}:", label);
    if ms < 500.0 {
        eprintln!("  {} {:>8.2}ms ({})", label.dimmed(), ms, "fast".dimmed());
    } else if ms < 2000.0 {
        eprintln!("  {} {:>8.2}ms ({})", label.dimmed(), ms, "moderate".bright_yellow());
    } else {
        eprintln!("  {} {:>8.2}ms ({})", label.dimmed(), ms, "slow".bright_red());
    }
}

fn rule(title: &str) {
    println!("{}", "═".repeat(60).dimmed());
    println!("{}", title.bold().cyan());
    println!("{}", "═".repeat(60).dimmed());
}

/// One item as a short block
pub fn print_item(item: &Item) {
    println!("{} {}", item.title.bold().bright_white(), format!("[{}]", item.id).dimmed());
    if let Some(sub_title) = &item.sub_title {
        println!("  {}", sub_title.bright_blue());
    }
    if !item.tags.is_empty() {
        println!("  {} {}", "Tags:".dimmed(), item.tags.join(", "));
    }
    if let Some(description) = &item.description {
        for line in description.lines() {
            println!("  {}", line);
        }
    }
    if let Some(cover) = &item.cover {
        println!("  {} {}", "Cover:".dimmed(), cover.underline());
    }
}

pub fn print_sections(sections: &[Section]) {
    for section in sections {
        rule(&section.title);
        for item in &section.items {
            print_item(item);
        }
        println!();
    }
}

pub fn print_page(page: &PageResult, current: u32) {
    for item in &page.items {
        print_item(item);
    }
    println!("\n{} {}/{}", "Page".dimmed(), current.max(1), page.max_page);
}

pub fn print_facets(facets: &[CategoryFacet]) {
    for facet in facets {
        rule(&facet.name);
        for (label, param) in facet.value_labels.iter().zip(&facet.value_params) {
            println!("  {:<12} {}", param.bright_cyan(), label);
        }
        println!();
    }
}

pub fn print_sort_options() {
    for option in SortOption::ALL {
        println!("  {:<16} {}", option.key().bright_cyan(), option.label());
    }
}

pub fn print_folders(list: &FolderList) {
    for (key, title) in &list.folders {
        println!("  {:<10} {}", key.bright_cyan(), title);
    }
}

pub fn print_detail(detail: &ComicDetail) {
    rule(&detail.title);
    println!("  {} {}", "Id:".dimmed(), detail.id);
    println!("  {} {}", "Numeric id:".dimmed(), detail.internal_numeric_id);
    if let Some(cover) = &detail.cover {
        println!("  {} {}", "Cover:".dimmed(), cover.underline());
    }
    for (label, values) in detail.tag_groups.iter() {
        println!("  {} {}", format!("{}:", label).dimmed(), values.join(", "));
    }
    if let Some(description) = &detail.description {
        println!("\n{}", description);
    }

    if !detail.chapters.is_empty() {
        println!("\n{}", "Chapters".bold().cyan());
        for chapter in &detail.chapters {
            println!("  {:<10} {}", chapter.id.bright_cyan(), chapter.title);
        }
    }

    if !detail.related.is_empty() {
        println!("\n{}", "Related".bold().cyan());
        for item in &detail.related {
            println!("  {} {}", item.title, format!("[{}]", item.id).dimmed());
        }
    }
}

pub fn print_chapter(chapter: &ChapterImages) {
    for (name, value) in &chapter.headers {
        eprintln!("  {} {}", format!("{}:", name).dimmed(), value);
    }
    for image in &chapter.images {
        println!("{}", image);
    }
}
