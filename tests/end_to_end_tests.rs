use content_columns::{compile, generate, manifest, CompileArgs, ConfigArgs, GenerateArgs, ManifestArgs};
use std::fs;
use tempfile::tempdir;

const CONFIG: &str = r##"
theme:
  colGap:
    sm: 1rem
    md: 1.5rem
  colRuleColor:
    tailwind: "#38b2ac"
  extend:
    colCount:
      7: "7"
"##;

fn generate_args(dir: &std::path::Path) -> GenerateArgs {
    GenerateArgs {
        config: ConfigArgs {
            config: Some(dir.join("columns.yaml")),
            prefix: None,
        },
        input: vec![format!("{}/*.html", dir.display())],
        exclude: vec![],
        all: false,
        output: Some(dir.join("dist/columns.css")),
        minify: false,
        no_header: false,
    }
}

#[test]
fn test_end_to_end_css_generation() {
    let temp_dir = tempdir().unwrap();
    fs::write(temp_dir.path().join("columns.yaml"), CONFIG).unwrap();
    fs::write(
        temp_dir.path().join("index.html"),
        r#"
        <article class="col-count-2 md:col-count-7 col-gap-sm">
            <h1 class="col-span-all hover:col-rule-tailwind">Title</h1>
            <p class="text-gray-700 col-gap-xl">Body</p>
        </article>
        "#,
    )
    .unwrap();

    let args = generate_args(temp_dir.path());
    let result = generate(&args).unwrap();

    let css = fs::read_to_string(temp_dir.path().join("dist/columns.css")).unwrap();
    assert_eq!(css, result.css);

    assert!(css.contains("Generated by content-columns"));
    assert!(css.contains(".col-count-2 {\n  column-count: 2;\n}"));
    assert!(css.contains(".col-gap-sm {\n  column-gap: 1rem;\n}"));
    assert!(css.contains(".col-span-all {\n  column-span: all;\n}"));
    assert!(css.contains(".hover\\:col-rule-tailwind:hover {\n  column-rule-color: #38b2ac;\n}"));
    assert!(css.contains("@media (min-width: 768px) {\n  .md\\:col-count-7 {\n    column-count: 7;\n  }\n}"));

    // Not in the configured gap scale
    assert!(!css.contains("col-gap-xl"));
    assert!(!css.contains("text-gray-700"));

    assert_eq!(result.total_files, 1);
    assert!(result.total_candidates >= 6);
}

#[test]
fn test_generate_all_without_header() {
    let temp_dir = tempdir().unwrap();
    fs::write(temp_dir.path().join("columns.yaml"), CONFIG).unwrap();

    let mut args = generate_args(temp_dir.path());
    args.input.clear();
    args.all = true;
    args.no_header = true;
    args.output = None;

    let result = generate(&args).unwrap();

    assert!(result.css.starts_with(".col-count-auto {"));
    assert!(result.css.contains(".col-count-7 {"));
    assert!(result.css.contains(".col-rule-tailwind {"));
    assert!(!result.css.contains("@media"));
    assert_eq!(result.total_files, 0);
    assert_eq!(result.total_candidates, result.total_utilities);
}

#[test]
fn test_generate_minified_with_prefix() {
    let temp_dir = tempdir().unwrap();
    fs::write(temp_dir.path().join("columns.yaml"), CONFIG).unwrap();
    fs::write(temp_dir.path().join("page.html"), r#"<div class="tw-col-gap-md col-gap-sm">"#).unwrap();

    let mut args = generate_args(temp_dir.path());
    args.config.prefix = Some("tw-".to_string());
    args.minify = true;
    args.output = None;

    let result = generate(&args).unwrap();

    assert!(result.css.starts_with("/* Generated by content-columns"));
    assert!(result.css.ends_with(".tw-col-gap-md{column-gap:1.5rem;}"));
    assert!(!result.css.contains(".col-gap-sm"));
}

#[test]
fn test_compile_stylesheet_with_content() {
    let temp_dir = tempdir().unwrap();
    fs::write(temp_dir.path().join("columns.yaml"), CONFIG).unwrap();
    fs::write(temp_dir.path().join("index.html"), r#"<main class="col-count-3">"#).unwrap();

    let stylesheet = temp_dir.path().join("app.css");
    fs::write(
        &stylesheet,
        r#"/* Layout */
@tailwind base;
@tailwind utilities;

article {
  @apply col-count-2 col-gap-md lg:col-count-7;
}
"#,
    )
    .unwrap();

    let output = temp_dir.path().join("out/app.css");
    let args = CompileArgs {
        stylesheet,
        config: ConfigArgs {
            config: Some(temp_dir.path().join("columns.yaml")),
            prefix: None,
        },
        input: vec![format!("{}/*.html", temp_dir.path().display())],
        output: Some(output.clone()),
        minify: false,
    };

    let result = compile(&args).unwrap();
    assert_eq!(fs::read_to_string(&output).unwrap(), result.css);
    assert_eq!(
        result.css,
        ".col-count-3 {\n  column-count: 3;\n}\n\narticle {\n  column-count: 2;\n  column-gap: 1.5rem;\n}\n\n@media (min-width: 1024px) {\n  article {\n    column-count: 7;\n  }\n}\n"
    );
}

#[test]
fn test_compile_reports_unknown_class() {
    let temp_dir = tempdir().unwrap();
    let stylesheet = temp_dir.path().join("app.css");
    fs::write(&stylesheet, "article {\n  @apply col-count-99;\n}\n").unwrap();

    let args = CompileArgs {
        stylesheet,
        config: ConfigArgs::default(),
        input: vec![],
        output: None,
        minify: false,
    };

    let err = compile(&args).unwrap_err();
    assert!(err.to_string().contains("col-count-99"));
}

#[test]
fn test_manifest_generation() {
    let temp_dir = tempdir().unwrap();
    fs::write(temp_dir.path().join("columns.yaml"), CONFIG).unwrap();
    let output = temp_dir.path().join("columns.json");

    let args = ManifestArgs {
        config: ConfigArgs {
            config: Some(temp_dir.path().join("columns.yaml")),
            prefix: None,
        },
        output: Some(output.clone()),
        minify: false,
    };

    let json = manifest(&args).unwrap();
    assert_eq!(fs::read_to_string(&output).unwrap(), json);

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let gap = &value["classes"][".col-gap-sm"]["declarations"][0];
    assert_eq!(gap["property"], "column-gap");
    assert_eq!(gap["value"], "1rem");
    assert_eq!(value["metadata"]["screens"]["md"], "768px");
    assert_eq!(value["statistics"]["per_property"]["colGap"], 2);
}
