use std::{
    collections::BTreeSet,
    env, fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result, bail};
use rayon::prelude::*;
use swc_common::SourceMap;
use time::OffsetDateTime;

use super::helper::{relative_path, resolve_dir, write_artifact};
use super::{BuildSummary, CommandResult, CommandSummary, ParseFailure};
use crate::catalog::{self, CatalogFormat};
use crate::cli::args::BuildCommand;
use crate::config::{Config, load_config};
use crate::core::context::BuildContext;
use crate::core::file_scanner::{SourceFilter, scan_files};
use crate::core::parsers::{ParsedSource, parse_source};
use crate::core::scan::transform_parsed;
use crate::error::Error;

/// File name of the POT template inside the locales directory.
pub const TEMPLATE_FILE_NAME: &str = "messages.pot";

/// Resolved locations for one build.
struct BuildPaths {
    source_root: PathBuf,
    out_dir: Option<PathBuf>,
    locales_dir: PathBuf,
}

impl BuildPaths {
    fn resolve(cmd: &BuildCommand, config: &Config, base_dir: &Path) -> Self {
        Self {
            source_root: resolve_dir(cmd.source_root.as_deref(), &config.source_root, base_dir),
            out_dir: match (&cmd.out_dir, &config.out_dir) {
                (Some(dir), _) => Some(dir.clone()),
                (None, Some(dir)) => Some(base_dir.join(dir)),
                (None, None) => None,
            },
            locales_dir: resolve_dir(cmd.locales_dir.as_deref(), &config.locales_dir, base_dir),
        }
    }
}

fn is_production(cmd: &BuildCommand) -> bool {
    cmd.production || env::var("NODE_ENV").is_ok_and(|value| value == "production")
}

/// Whether to write PO/POT output. Explicitly requested output that cannot
/// be produced is fatal; otherwise the build degrades to JSON only.
fn catalog_enabled(config: &Config) -> Result<bool> {
    match config.catalog {
        Some(true) if !catalog::catalog_supported() => {
            Err(Error::CatalogFormatUnavailable).context("'catalog' is enabled in the config")
        }
        Some(enabled) => Ok(enabled),
        None => Ok(catalog::catalog_supported()),
    }
}

pub fn build(cmd: BuildCommand) -> Result<CommandResult> {
    let cwd = env::current_dir().context("Failed to read the working directory")?;
    let loaded = load_config(&cwd)?;
    let config = loaded.config;
    let paths = BuildPaths::resolve(&cmd, &config, &loaded.base_dir);
    let options = config.transform_options(is_production(&cmd));
    let with_catalog = catalog_enabled(&config)?;

    if !paths.source_root.is_dir() {
        bail!(
            "Source root does not exist: {}",
            paths.source_root.display()
        );
    }
    tracing::debug!(
        source_root = %paths.source_root.display(),
        config_file = loaded.from_file,
        production = options.production,
        "starting build"
    );

    // Never scan what a previous build wrote
    let mut ignores = config.ignores.clone();
    if let Some(out_dir) = &paths.out_dir
        && let Ok(inside) = cwd.join(out_dir).strip_prefix(cwd.join(&paths.source_root))
        && !inside.as_os_str().is_empty()
    {
        ignores.push(inside.to_string_lossy().into_owned());
    }

    let filter = SourceFilter::new(&ignores, config.ignore_test_files);
    let files: Vec<PathBuf> = scan_files(&paths.source_root, &config.includes, &filter)
        .into_iter()
        .collect();

    let mut summary = BuildSummary {
        files_scanned: files.len(),
        ..Default::default()
    };

    // Parse in parallel; everything that touches the build context runs in
    // path order below so ids are assigned deterministically.
    let source_map = Arc::new(SourceMap::default());
    let parsed: Vec<(String, crate::Result<ParsedSource>)> = files
        .par_iter()
        .map(|file| {
            let rel = relative_path(file, &paths.source_root);
            let result = fs::read_to_string(file)
                .map_err(|e| Error::Parse {
                    file_path: rel.clone(),
                    message: e.to_string(),
                })
                .and_then(|code| parse_source(code, &rel, Arc::clone(&source_map)));
            (rel, result)
        })
        .collect();

    let mut ctx = BuildContext::new(&options);
    for (rel, result) in parsed {
        let source = match result {
            Ok(source) => source,
            Err(err) if err.is_recoverable() => {
                tracing::debug!("{}", err);
                let message = match err {
                    Error::Parse { message, .. } => message,
                    other => other.to_string(),
                };
                summary.parse_failures.push(ParseFailure {
                    file_path: rel,
                    message,
                });
                continue;
            }
            Err(err) => return Err(err.into()),
        };

        let output = transform_parsed(&source, &options, &mut ctx)
            .with_context(|| format!("Failed to transform {}", rel))?;
        tracing::debug!(
            file = %rel,
            messages = output.messages,
            excluded = output.excluded,
            "scanned"
        );
        summary.messages += output.messages;
        summary.excluded += output.excluded;
        if output.did_transform {
            summary.files_transformed += 1;
        }

        if let Some(out_dir) = &paths.out_dir {
            let target = out_dir.join(&rel);
            write_artifact("source", &target, output.code.as_bytes())?;
            summary.written.push(target);
        }
    }

    let store = ctx.into_store();
    summary.unique_messages = store.len();
    let serialize_options = config.serialize_options();

    // Source dictionary
    let dictionary_path = paths
        .locales_dir
        .join(format!("{}.json", config.source_locale));
    if let Ok(previous) = fs::read(&dictionary_path) {
        match catalog::parse_json_dictionary(&previous, config.top_level_key.as_deref()) {
            Ok(previous) => {
                summary.removed_ids = previous.keys().filter(|id| store.get(id).is_none()).count();
            }
            Err(err) => tracing::warn!(
                "Ignoring unreadable dictionary {}: {}",
                dictionary_path.display(),
                err
            ),
        }
    }
    catalog::serialize(
        &store,
        CatalogFormat::Json,
        &serialize_options,
        &dictionary_path,
    )?;
    summary.written.push(dictionary_path);

    if !with_catalog {
        if config.catalog.is_none() {
            tracing::warn!("PO catalog support is not available; writing JSON only");
            summary.catalog_skipped = true;
        }
        return Ok(CommandResult::new(CommandSummary::Build(summary)));
    }

    // Template and per-locale catalogs
    let template_path = paths.locales_dir.join(TEMPLATE_FILE_NAME);
    catalog::serialize(
        &store,
        CatalogFormat::Catalog,
        &serialize_options,
        &template_path,
    )?;
    summary.written.push(template_path.clone());

    let revised_at = OffsetDateTime::now_utc();
    let locales: BTreeSet<&str> = config
        .locales
        .iter()
        .map(String::as_str)
        .filter(|locale| *locale != config.source_locale)
        .collect();
    for locale in locales {
        let po_path = paths.locales_dir.join(format!("{locale}.po"));
        match fs::metadata(&po_path) {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => bail!(
                "Failed to read catalog: {} is not a file",
                po_path.display()
            ),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                catalog::init_catalog(&template_path, locale, &po_path)?;
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to read catalog: {}", po_path.display()));
            }
        }
        catalog::merge_catalogs(&po_path, &template_path, &po_path, revised_at)
            .with_context(|| format!("Failed to merge {}", po_path.display()))?;
        summary.written.push(po_path.clone());

        let compiled = catalog::compile_dictionary(&store, &po_path, config.fallback_to_source)?;
        let compiled_path = paths.locales_dir.join(format!("{locale}.json"));
        catalog::write_json_dictionary(&compiled, &serialize_options, &compiled_path)?;
        summary.written.push(compiled_path);
    }

    Ok(CommandResult::new(CommandSummary::Build(summary)))
}
