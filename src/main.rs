use clap::{Arg, ArgAction, Command};
use std::error::Error;
use std::path;
use std::sync::Arc;

use clipsync::logging;
use clipsync::manifest::Manifest;
use clipsync::scanner::{HashManifestBuilder, LocalFolder};
use clipsync::session::SyncSession;
use clipsync::watcher::FolderWatcher;
use clipsync::SessionOptions;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
	let matches = Command::new("ClipSync")
		.version("0.1.0")
		.about("Content-hash manifest synchronizer for shared media folders")
		.subcommand_required(true)
		.arg(
			Arg::new("state-dir")
				.short('s')
				.long("state-dir")
				.value_name("DIR")
				.help("Directory for the persistent hash cache"),
		)
		.arg(
			Arg::new("profile")
				.short('p')
				.long("profile")
				.value_name("PROFILE")
				.help("Profile name isolating cache databases"),
		)
		.arg(
			Arg::new("verbose")
				.short('v')
				.long("verbose")
				.action(ArgAction::SetTrue)
				.help("Log at debug level (RUST_LOG overrides)"),
		)
		.subcommand(
			Command::new("scan")
				.about("Scan a folder and print its manifest as JSON")
				.arg(Arg::new("dir").required(true)),
		)
		.subcommand(
			Command::new("diff")
				.about("Reconcile a folder against a remote manifest file")
				.arg(Arg::new("dir").required(true))
				.arg(Arg::new("manifest").required(true)),
		)
		.subcommand(
			Command::new("watch")
				.about("Watch a folder, rescanning on changes until interrupted")
				.arg(Arg::new("dir").required(true)),
		)
		.get_matches();

	logging::init_tracing(if matches.get_flag("verbose") { "debug" } else { "info" });

	let mut options = SessionOptions::default();
	if let Some(dir) = matches.get_one::<String>("state-dir") {
		options.state_dir = Some(path::PathBuf::from(dir));
		options.persist_cache = true;
	}
	if let Some(profile) = matches.get_one::<String>("profile") {
		options.profile = profile.clone();
	}

	if let Some(sub) = matches.subcommand_matches("scan") {
		let dir = sub.get_one::<String>("dir").ok_or("scan: directory argument required")?;
		let builder = HashManifestBuilder::new(LocalFolder::new(dir));
		let records = builder.scan().await?;
		let manifest = Manifest::from_records(&records);
		println!("{}", serde_json::to_string_pretty(&manifest)?);
	} else if let Some(sub) = matches.subcommand_matches("diff") {
		let dir = sub.get_one::<String>("dir").ok_or("diff: directory argument required")?;
		let manifest_path = sub
			.get_one::<String>("manifest")
			.ok_or("diff: manifest file argument required")?;

		let remote = Manifest::from_json_str(&std::fs::read_to_string(manifest_path)?)?;
		let session = SyncSession::new(LocalFolder::new(dir), options)?;
		let result = session.reconcile(&remote).await?;

		if result.is_empty() {
			eprintln!("in sync");
		}
		for (name, condition) in &result {
			println!("{:?}\t{}", condition, name);
		}
	} else if let Some(sub) = matches.subcommand_matches("watch") {
		let dir = sub.get_one::<String>("dir").ok_or("watch: directory argument required")?;
		let folder_path = path::PathBuf::from(dir);

		let session = Arc::new(SyncSession::new(LocalFolder::new(dir), options)?);
		session.rescan().await?;

		let _watcher = FolderWatcher::start(&folder_path, session)?;
		tokio::signal::ctrl_c().await?;
	}

	Ok(())
}

// vim: ts=4
