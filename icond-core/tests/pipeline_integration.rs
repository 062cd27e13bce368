use icond_core::config::{IconConfig, SvgoConfig};
use icond_core::contract::{
    BundleOutput, ExportManifest, MockBundler, MockConverter, MockExporter, MockPublisher,
    PublishOptions, PublishOutcome,
};
use icond_core::convert::TypeScriptConverter;
use icond_core::error::{BuildError, ConvertError, FetchError, ToolError};
use icond_core::pipeline::{build, fetch, publish};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn config_at(root: &Path) -> IconConfig {
    IconConfig::default().with_root(root)
}

fn seed_svgs(config: &IconConfig) {
    let svg_dir = config.svg_dir();
    fs::create_dir_all(&svg_dir).unwrap();
    fs::write(
        svg_dir.join("Home.svg"),
        r##"<svg width="24" height="24"><path fill="#333"/></svg>"##,
    )
    .unwrap();
    fs::write(
        svg_dir.join("Arrow Left.svg"),
        r#"<svg width="16" height="16"><path stroke="black"/></svg>"#,
    )
    .unwrap();
}

fn accepting_bundler(expected_entry: PathBuf) -> MockBundler {
    let mut bundler = MockBundler::new();
    bundler
        .expect_bundle()
        .withf(move |entry, _dist| entry.to_path_buf() == expected_entry)
        .times(1)
        .returning(|_entry, dist| {
            Ok(BundleOutput {
                artifacts: vec![dist.join("index.js"), dist.join("index.cjs")],
            })
        });
    bundler
}

#[tokio::test]
async fn build_runs_every_stage_in_order() {
    let root = tempdir().unwrap();
    let config = config_at(root.path());
    seed_svgs(&config);

    let converter = TypeScriptConverter::new(config.icon_generation.clone());
    let bundler = accepting_bundler(config.entry_point());

    let report = build(&config, &converter, &bundler, false)
        .await
        .expect("build should succeed");

    assert!(report.is_clean());
    assert_eq!(report.process.assets.len(), 2);
    assert_eq!(report.process.files_recolored(), 2);
    assert_eq!(report.rewrite.identifiers_renamed(), 2);
    assert_eq!(report.bundle.artifacts.len(), 2);

    assert!(config.svg_dir().join("home.svg").exists());
    assert!(config.svg_dir().join("arrow-left-16.svg").exists());

    let barrel = fs::read_to_string(config.entry_point()).unwrap();
    assert!(barrel.contains("export { home as iconHome } from './home.icon';"));
    assert!(barrel.contains("export { arrowLeft16 as iconArrowLeft16 } from './arrow-left-16.icon';"));

    let home = fs::read_to_string(config.icons_dir().join("home.icon.ts")).unwrap();
    assert!(home.starts_with("export const iconHome: {"));
    assert!(home.contains("fill=\"currentColor\""));
    assert!(home.ends_with("export { iconHome as home };\n"));

    let package_json = fs::read_to_string(config.dist_dir().join("package.json")).unwrap();
    assert!(package_json.contains("\"name\": \"@your-org/icons\""));
    assert!(config.dist_dir().join("README.md").exists());
}

#[tokio::test]
async fn build_without_svgs_fails_before_converting() {
    let root = tempdir().unwrap();
    let config = config_at(root.path());
    fs::create_dir_all(config.svg_dir()).unwrap();

    let mut converter = MockConverter::new();
    converter.expect_convert().never();
    let mut bundler = MockBundler::new();
    bundler.expect_bundle().never();

    let err = build(&config, &converter, &bundler, false)
        .await
        .expect_err("empty SVG directory");
    assert!(matches!(err, BuildError::NoSvgFiles { .. }));
}

#[tokio::test]
async fn converter_failure_stops_the_build() {
    let root = tempdir().unwrap();
    let config = config_at(root.path());
    seed_svgs(&config);

    let mut converter = MockConverter::new();
    converter.expect_convert().times(1).returning(|_icons, out_dir| {
        Err(ConvertError::Io {
            path: out_dir.to_path_buf(),
            source: std::io::Error::other("disk full"),
        })
    });
    let mut bundler = MockBundler::new();
    bundler.expect_bundle().never();

    let err = build(&config, &converter, &bundler, false)
        .await
        .expect_err("converter error must propagate");
    assert!(matches!(err, BuildError::Convert(_)));
}

#[tokio::test]
async fn converter_receives_unprefixed_symbols() {
    let root = tempdir().unwrap();
    let config = config_at(root.path());
    seed_svgs(&config);

    let mut converter = MockConverter::new();
    converter
        .expect_convert()
        .withf(|icons, _out_dir| {
            let symbols: Vec<&str> = icons.iter().map(|i| i.symbol.as_str()).collect();
            symbols == ["arrowLeft16", "home"]
        })
        .times(1)
        .returning(|_icons, _out_dir| {
            Err(ConvertError::Io {
                path: PathBuf::from("stop"),
                source: std::io::Error::other("stop after checking input"),
            })
        });
    let bundler = MockBundler::new();

    let _ = build(&config, &converter, &bundler, false).await;
}

#[tokio::test]
async fn collisions_do_not_fail_the_build_but_mark_it_unclean() {
    let root = tempdir().unwrap();
    let config = config_at(root.path());
    let svg_dir = config.svg_dir();
    fs::create_dir_all(&svg_dir).unwrap();
    fs::write(svg_dir.join("home.svg"), "<svg/>").unwrap();
    fs::write(svg_dir.join("Home.svg"), "<svg/>").unwrap();

    let converter = TypeScriptConverter::new(config.icon_generation.clone());
    let bundler = accepting_bundler(config.entry_point());

    let report = build(&config, &converter, &bundler, false).await.unwrap();
    assert!(!report.is_clean());
    assert_eq!(report.process.collisions.len(), 1);
    assert_eq!(report.conversion.files.len(), 1);
}

#[tokio::test]
async fn clean_build_removes_old_generated_sources() {
    let root = tempdir().unwrap();
    let config = config_at(root.path());
    seed_svgs(&config);
    fs::create_dir_all(config.icons_dir()).unwrap();
    fs::write(config.icons_dir().join("leftover.txt"), "old").unwrap();

    let converter = TypeScriptConverter::new(config.icon_generation.clone());
    let bundler = accepting_bundler(config.entry_point());

    build(&config, &converter, &bundler, true).await.unwrap();
    assert!(!config.icons_dir().join("leftover.txt").exists());
}

#[tokio::test]
async fn fetch_with_clean_empties_the_svg_directory_first() {
    let root = tempdir().unwrap();
    let config = config_at(root.path());
    fs::create_dir_all(config.svg_dir()).unwrap();
    fs::write(config.svg_dir().join("removed-upstream.svg"), "<svg/>").unwrap();

    let svg_dir = config.svg_dir();
    let mut exporter = MockExporter::new();
    exporter.expect_export_all().times(1).returning(move || {
        let path = svg_dir.join("fresh.svg");
        std::fs::write(&path, "<svg/>").unwrap();
        Ok(ExportManifest { files: vec![path] })
    });

    let manifest = fetch(&config, &exporter, true).await.unwrap();
    assert_eq!(manifest.files.len(), 1);
    assert!(!config.svg_dir().join("removed-upstream.svg").exists());
    assert!(config.svg_dir().join("fresh.svg").exists());
}

#[tokio::test]
async fn fetch_runs_svgo_after_export_when_configured() {
    let root = tempdir().unwrap();
    let mut config = config_at(root.path());
    config.figma.svgo = Some(SvgoConfig {
        plugins: vec!["preset-default".to_string()],
        bin: "icond-missing-svgo".to_string(),
    });
    fs::create_dir_all(config.svg_dir()).unwrap();

    let svg_dir = config.svg_dir();
    let mut exporter = MockExporter::new();
    exporter.expect_export_all().times(1).returning(move || {
        let path = svg_dir.join("fresh.svg");
        std::fs::write(&path, "<svg/>").unwrap();
        Ok(ExportManifest { files: vec![path] })
    });

    let err = fetch(&config, &exporter, false).await.unwrap_err();
    assert!(
        matches!(err, FetchError::Optimize(ToolError::NotFound { ref program }) if program == "icond-missing-svgo"),
        "got {err}"
    );
    assert!(config.svg_dir().join("fresh.svg").exists());
}

#[tokio::test]
async fn publish_hands_dist_and_options_to_publisher() {
    let root = tempdir().unwrap();
    let config = config_at(root.path());
    let options = PublishOptions::from_config(&config.publish, Some("next".to_string()), true);

    let expected_dist = config.dist_dir();
    let mut publisher = MockPublisher::new();
    publisher
        .expect_publish()
        .withf(move |dist, options| {
            dist.to_path_buf() == expected_dist && options.tag.as_deref() == Some("next") && options.dry_run
        })
        .times(1)
        .returning(|dist, options| {
            Ok(PublishOutcome {
                package_dir: dist.to_path_buf(),
                dry_run: options.dry_run,
            })
        });

    let outcome = publish(&config, &publisher, &options).await.unwrap();
    assert!(outcome.dry_run);
    assert_eq!(outcome.package_dir, config.dist_dir());
}

#[tokio::test]
async fn prefixed_label_cannot_shadow_another_export() {
    let root = tempdir().unwrap();
    let config = config_at(root.path());
    let svg_dir = config.svg_dir();
    fs::create_dir_all(&svg_dir).unwrap();
    fs::write(svg_dir.join("Home.svg"), "<svg/>").unwrap();
    fs::write(svg_dir.join("Icon Home.svg"), "<svg/>").unwrap();

    let converter = TypeScriptConverter::new(config.icon_generation.clone());
    let bundler = accepting_bundler(config.entry_point());

    let report = build(&config, &converter, &bundler, false).await.unwrap();
    assert!(!report.is_clean());
    assert_eq!(report.process.collisions.len(), 1);
    assert_eq!(report.process.collisions[0].name, "iconHome");
    assert!(svg_dir.join("Icon Home.svg").exists());

    let barrel = fs::read_to_string(config.entry_point()).unwrap();
    assert_eq!(barrel.matches("iconHome").count(), 1, "barrel: {barrel}");
}

#[tokio::test]
async fn unreadable_svg_directory_is_not_reported_as_empty() {
    let root = tempdir().unwrap();
    let config = config_at(root.path());
    fs::create_dir_all(config.svg_dir().parent().unwrap()).unwrap();
    fs::write(config.svg_dir(), "not a directory").unwrap();

    let mut converter = MockConverter::new();
    converter.expect_convert().never();
    let mut bundler = MockBundler::new();
    bundler.expect_bundle().never();

    let err = build(&config, &converter, &bundler, false)
        .await
        .expect_err("svg dir is a file");
    assert!(matches!(err, BuildError::SvgDir { .. }), "got {err}");
}
