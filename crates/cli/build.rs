use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let page = || clap::arg!(-p --page <NUM> "Page number").default_value("1");
    let mut cmd = clap::Command::new("batcave")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Browse the batcave.biz comic catalog")
        .subcommand_required(true)
        .arg(clap::arg!(--"base-url" <URL> "Site root to query").global(true).default_value("https://batcave.biz"))
        .arg(clap::arg!(--timeout <SECS> "HTTP timeout in seconds").global(true).default_value("30"))
        .arg(clap::arg!(--"user-agent" <UA> "Custom User-Agent for HTTP requests").global(true))
        .arg(
            clap::arg!(-f --format <FORMAT> "Output format (json, text)")
                .global(true)
                .default_value("text")
                .value_parser(["json", "text"]),
        )
        .arg(clap::arg!(-v --verbose "Enable debug logging").global(true))
        .subcommand(clap::Command::new("home").about("Homepage sections").arg(page()))
        .subcommand(clap::Command::new("categories").about("Category facets and their tokens"))
        .subcommand(clap::Command::new("sorts").about("Sort options accepted by `category`"))
        .subcommand(
            clap::Command::new("category")
                .about("One page of a category listing")
                .arg(clap::arg!(<TOKEN> "Category token, e.g. g_14"))
                .arg(
                    clap::arg!(-s --sort <KEY> "Sort option key").value_parser([
                        "date_desc",
                        "date_asc",
                        "editdate_desc",
                        "rating_desc",
                        "news_read_desc",
                        "comm_num_desc",
                        "title_asc",
                        "title_desc",
                    ]),
                )
                .arg(page()),
        )
        .subcommand(clap::Command::new("search").about("Keyword search").arg(clap::arg!(<KEYWORD>)).arg(page()))
        .subcommand(clap::Command::new("detail").about("Comic details, chapters and related comics").arg(clap::arg!(<ID>)))
        .subcommand(
            clap::Command::new("chapter")
                .about("Image URLs of one chapter")
                .arg(clap::arg!(<COMIC_ID>))
                .arg(clap::arg!(<CHAPTER_ID>)),
        )
        .subcommand(
            clap::Command::new("login")
                .about("Check account credentials")
                .arg(clap::arg!(--account <ACCOUNT>).required(true))
                .arg(clap::arg!(--password <PASSWORD>).required(true)),
        )
        .subcommand(
            clap::Command::new("favorites")
                .about("Comics in a favorites folder (logs in first)")
                .arg(clap::arg!(--folder <FOLDER> "Folder key or number").default_value("reading"))
                .arg(page())
                .arg(clap::arg!(--account <ACCOUNT>))
                .arg(clap::arg!(--password <PASSWORD>))
                .arg(clap::arg!(--"list-folders" "Only list the available folders")),
        )
        .subcommand(clap::Command::new("resolve").about("Resolve a comic page link to its slug-id").arg(clap::arg!(<LINK>)));

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "batcave", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "batcave", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "batcave", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "batcave", &completions_dir).unwrap();

    println!("cargo:rustc-env=BATCAVE_COMPLETIONS_DIR={}", completions_dir.display());
    println!(
        "cargo:warning=Shell completions generated in: {}",
        completions_dir.display()
    );
}
