use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use formset_dom::{Document, NodeId, Selector, render};
use formset_engine::{EventLog, FormsetManager, INDEXED_ATTRIBUTES, NoopListener, class_selector, is_soft_deleted};
use formset_types::{FieldIdentifier, FormsetOptions};
use formset_util::{load_document, load_options};
use serde_json::{Value, json};
use tracing::{info, warn};

/// Rows selector used when no row carries the managed-row class yet.
pub const FALLBACK_ROW_SELECTOR: &str = "[data-formset-row]";

#[derive(Args, Debug, Clone)]
pub struct DocumentArgs {
    /// JSON or YAML list of node specs describing the document
    #[arg(long)]
    pub document: PathBuf,

    /// Options file (defaults to $FORMSET_OPTIONS_PATH or the config directory)
    #[arg(long)]
    pub options: Option<PathBuf>,

    /// Selector matching the rows to manage
    #[arg(long)]
    pub rows: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub source: DocumentArgs,

    /// Number of clicks on the add link
    #[arg(long, default_value_t = 0)]
    pub add: usize,

    /// Zero-based index of a managed row to remove, applied after the adds
    #[arg(long = "remove", value_name = "ROW")]
    pub remove: Vec<usize>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Html)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Html,
    Json,
}

/// `.{formCssClass}` when some element already carries the class, else [`FALLBACK_ROW_SELECTOR`].
pub fn default_row_selector(document: &Document, options: &FormsetOptions) -> String {
    let class_rows = format!(".{}", class_selector(&options.form_css_class));
    match Selector::parse(&class_rows) {
        Ok(selector) if !document.select(&selector).is_empty() => class_rows,
        _ => FALLBACK_ROW_SELECTOR.to_string(),
    }
}

struct Loaded {
    document: Document,
    options: FormsetOptions,
    rows: String,
}

fn load(args: &DocumentArgs) -> Result<Loaded> {
    let document = load_document(&args.document).with_context(|| format!("Failed to load document: {}", args.document.display()))?;
    let options = load_options(args.options.as_deref()).context("Failed to load formset options")?;
    let rows = args.rows.clone().unwrap_or_else(|| default_row_selector(&document, &options));
    Ok(Loaded { document, options, rows })
}

pub fn run(args: &RunArgs) -> Result<String> {
    let Loaded {
        mut document,
        options,
        rows,
    } = load(&args.source)?;
    let mut manager = FormsetManager::attach_selector(&mut document, &rows, options, EventLog::default())
        .with_context(|| format!("Invalid rows selector: {rows}"))?;

    for click in 0..args.add {
        let Some(affordance) = manager.add_affordances().first().copied() else {
            anyhow::bail!("No add link was installed; does '{rows}' match any row?");
        };
        if !document.is_visible(affordance.link) {
            warn!(click, "Add link is hidden; skipping remaining adds");
            break;
        }
        if manager.handle_click(&mut document, affordance.link).is_none() {
            warn!(click, "Add click had no effect");
        }
    }

    for ordinal in args.remove.iter().copied() {
        let managed = manager.managed_rows(&document);
        let row = *managed
            .get(ordinal)
            .with_context(|| format!("No managed row at index {ordinal}; {} rows are managed", managed.len()))?;
        let link = document
            .select_within(row, &manager.selectors().delete_links)
            .into_iter()
            .find(|link| document.is_visible(*link));
        let Some(link) = link else {
            warn!(row = ordinal, "Row has no visible delete link; skipping removal");
            continue;
        };
        if manager.handle_click(&mut document, link).is_none() {
            warn!(row = ordinal, "Delete click had no effect");
        }
    }

    info!(
        events = manager.listener().events().len(),
        visible_forms = manager.visible_forms(),
        "Applied formset clicks"
    );
    render_output(&document, args.format)
}

fn render_output(document: &Document, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Html => Ok(render(document, document.root())),
        OutputFormat::Json => serde_json::to_string_pretty(&document.to_specs()).context("Failed to serialize document"),
    }
}

pub fn inspect(args: &DocumentArgs) -> Result<String> {
    let Loaded {
        mut document,
        options,
        rows,
    } = load(args)?;
    let manager = FormsetManager::attach_selector(&mut document, &rows, options, NoopListener)
        .with_context(|| format!("Invalid rows selector: {rows}"))?;

    let management = manager.management_form(&document);
    let policy = management.policy();
    let visible_forms = manager.visible_forms();
    let row_reports: Vec<Value> = manager
        .managed_rows(&document)
        .into_iter()
        .enumerate()
        .map(|(ordinal, row)| row_report(&document, &manager, ordinal, row))
        .collect();

    let report = json!({
        "prefix": manager.options().prefix,
        "rowsSelector": rows,
        "management": {
            "totalForms": management.total_forms,
            "initialForms": management.initial_forms,
            "minNumForms": management.min_num_forms,
            "maxNumForms": management.max_num_forms,
        },
        "visibleForms": visible_forms,
        "canAdd": policy.can_add(visible_forms),
        "canDelete": policy.can_delete(visible_forms),
        "hasTemplate": manager.template().is_some(),
        "rows": row_reports,
    });
    serde_json::to_string_pretty(&report).context("Failed to serialize inspection report")
}

fn row_report(document: &Document, manager: &FormsetManager, ordinal: usize, row: NodeId) -> Value {
    let prefix = &manager.options().prefix;
    let mut fields = Vec::new();
    for field in document.select_within(row, &manager.selectors().fields) {
        for attribute in INDEXED_ATTRIBUTES {
            let Some(raw) = document.attr(field, attribute) else {
                continue;
            };
            let Some(identifier) = FieldIdentifier::parse(raw, prefix) else {
                continue;
            };
            fields.push(json!({
                "tag": document.tag(field),
                "attribute": attribute,
                "value": raw,
                "index": identifier.index().to_string(),
                "field": identifier.suffix(),
            }));
        }
    }
    json!({
        "ordinal": ordinal,
        "visible": document.is_visible(row),
        "softDeleted": is_soft_deleted(document, row),
        "fields": fields,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const ROWS: &str = r#"[
        { "tag": "input", "attrs": { "type": "hidden", "id": "id_item-TOTAL_FORMS", "name": "item-TOTAL_FORMS", "value": "2" } },
        { "tag": "input", "attrs": { "type": "hidden", "id": "id_item-MAX_NUM_FORMS", "name": "item-MAX_NUM_FORMS", "value": "3" } },
        { "tag": "div", "attrs": { "data-formset-row": "" }, "children": [
            { "tag": "input", "attrs": { "id": "id_item-0-title", "name": "item-0-title", "value": "Lamp" } }
        ] },
        { "tag": "div", "attrs": { "data-formset-row": "" }, "children": [
            { "tag": "input", "attrs": { "id": "id_item-1-title", "name": "item-1-title", "value": "Desk" } }
        ] }
    ]"#;

    fn write_fixture(dir: &tempfile::TempDir) -> DocumentArgs {
        let document = dir.path().join("rows.json");
        let options = dir.path().join("options.yaml");
        fs::write(&document, ROWS).unwrap();
        fs::write(&options, "prefix: item\n").unwrap();
        DocumentArgs {
            document,
            options: Some(options),
            rows: None,
        }
    }

    #[test]
    fn default_selector_prefers_managed_class() {
        let options = FormsetOptions::default();
        let mut document = Document::new();
        assert_eq!(default_row_selector(&document, &options), FALLBACK_ROW_SELECTOR);

        let row = document.create_element_with("div", &[("class", "dynamic-form")]);
        let root = document.root();
        document.append_child(root, row).unwrap();
        assert_eq!(default_row_selector(&document, &options), ".dynamic-form");
    }

    #[test]
    fn run_applies_adds_then_removes() {
        let dir = tempdir().unwrap();
        let args = RunArgs {
            source: write_fixture(&dir),
            add: 1,
            remove: vec![0],
            format: OutputFormat::Html,
        };
        let html = run(&args).unwrap();
        assert!(html.contains(r#"name="item-0-title" value="Desk""#), "{html}");
        assert!(html.contains(r#"name="item-1-title" value="""#), "{html}");
        assert!(!html.contains("Lamp"));
        assert!(html.contains(r#"id="id_item-TOTAL_FORMS" name="item-TOTAL_FORMS" value="2""#), "{html}");
    }

    #[test]
    fn run_stops_adding_at_the_maximum() {
        let dir = tempdir().unwrap();
        let args = RunArgs {
            source: write_fixture(&dir),
            add: 4,
            remove: Vec::new(),
            format: OutputFormat::Json,
        };
        let output = run(&args).unwrap();
        assert!(output.contains("item-2-title"));
        assert!(!output.contains("item-3-title"));
    }

    #[test]
    fn run_rejects_unknown_row_index() {
        let dir = tempdir().unwrap();
        let args = RunArgs {
            source: write_fixture(&dir),
            add: 0,
            remove: vec![7],
            format: OutputFormat::Html,
        };
        let error = run(&args).unwrap_err();
        assert!(error.to_string().contains("No managed row at index 7"));
    }

    #[test]
    fn inspect_reports_counters_and_fields() {
        let dir = tempdir().unwrap();
        let report: Value = serde_json::from_str(&inspect(&write_fixture(&dir)).unwrap()).unwrap();
        assert_eq!(report["prefix"], "item");
        assert_eq!(report["rowsSelector"], FALLBACK_ROW_SELECTOR);
        assert_eq!(report["management"]["totalForms"], 2);
        assert_eq!(report["management"]["minNumForms"], Value::Null);
        assert_eq!(report["visibleForms"], 2);
        assert_eq!(report["canAdd"], true);
        assert_eq!(report["canDelete"], true);

        let rows = report["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        let fields = rows[1]["fields"].as_array().unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0]["attribute"], "id");
        assert_eq!(fields[0]["index"], "1");
        assert_eq!(fields[1]["field"], "title");
    }

    #[test]
    fn missing_document_is_reported_with_path() {
        let dir = tempdir().unwrap();
        let args = DocumentArgs {
            document: dir.path().join("absent.json"),
            options: None,
            rows: None,
        };
        let error = inspect(&args).unwrap_err();
        assert!(format!("{error:#}").contains("absent.json"));
    }
}
