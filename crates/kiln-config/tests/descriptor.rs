//! Behaviour of the development descriptor.

use kiln_config::{BuildConfig, BuildSettings, ConfigError, Loader, Mode, Plugin, SourceMap};
use proptest::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};

#[test]
fn entries_resolve_under_base_in_order() {
    let config = BuildConfig::development("/repo").expect("development config");
    assert_eq!(
        config.entries(),
        &[
            PathBuf::from("/repo/templates/js/script.dev.js"),
            PathBuf::from("/repo/app/script.js"),
        ]
    );
    assert_eq!(config.output().filename.as_str(), "[name].js");
    assert_eq!(config.output().public_path, "/");
    assert!(config.output().path_info);
}

#[test]
fn development_defines_only_development_flag() {
    let config = BuildConfig::development("/repo").expect("development config");
    assert_eq!(config.mode(), Mode::Development);
    assert_eq!(config.defines().get("development"), Some(&Value::Bool(true)));
    assert!(!config.defines().contains_key("production"));
}

#[test]
fn production_defines_only_production_flag() {
    let config = BuildConfig::production("/repo").expect("production config");
    assert_eq!(config.defines().get("production"), Some(&Value::Bool(true)));
    assert!(!config.defines().contains_key("development"));
    assert!(config.dev_server().is_none());
    assert!(!config.has_plugin("hot-reload"));
}

#[test]
fn development_activates_plugins_and_dev_server() {
    let config = BuildConfig::development("/repo").expect("development config");
    assert_eq!(config.source_map(), SourceMap::Inline);
    assert_eq!(
        config.plugins(),
        &[
            Plugin::DefineGlobals {},
            Plugin::HotReload {},
            Plugin::GenerateHtmlShell {
                template: PathBuf::from("/repo/templates/html/index.dev.html"),
            },
        ]
    );

    let dev = config.dev_server().expect("dev server");
    assert!(dev.hot);
    assert!(!dev.verbose);
    assert!(dev.open);
    assert!(dev.overlay);
}

#[test]
fn stylesheet_uses_css_rule_and_runs_css_loader_first() {
    let config = BuildConfig::development("/repo").expect("development config");
    let resource = Path::new("/repo/app/style.css");

    let matched = config.rules().resolve(resource).expect("css rule");
    assert_eq!(matched.rule.name, "css");
    assert_eq!(
        matched.rule.uses,
        vec![Loader::Style {}, Loader::Css { source_map: true }]
    );
    let order: Vec<_> = matched.loaders().map(Loader::label).collect();
    assert_eq!(order, vec!["css", "style"]);

    let catch_all = config.rules().get("assets").expect("catch-all rule");
    assert!(catch_all.excludes(resource));
    assert!(!catch_all.accepts(resource));
}

#[test]
fn image_keeps_path_and_extension() {
    let config = BuildConfig::development("/repo").expect("development config");
    let resource = Path::new("app/img/logo.png");

    let matched = config.rule_for(resource).expect("image rule");
    assert_eq!(matched.rule.name, "images");

    let name = config
        .asset_name(resource, b"\x89PNG")
        .expect("file loader")
        .expect("rendered name");
    assert_eq!(name, "app/img/logo.png");
}

#[test]
fn other_static_files_fall_back_to_catch_all() {
    let config = BuildConfig::development("/repo").expect("development config");
    let matched = config.rule_for(Path::new("fonts/inter.woff2")).expect("catch-all");
    assert_eq!(matched.rule.name, "assets");
    assert_eq!(matched.index, config.rules().len() - 1);

    let name = config
        .asset_name(Path::new("fonts/inter.woff2"), b"wOF2")
        .expect("file loader")
        .expect("rendered name");
    assert!(name.ends_with(".woff2"));
    assert_eq!(name.len(), 20 + ".woff2".len());
}

#[test]
fn html_and_json_are_left_to_the_bundler() {
    let config = BuildConfig::development("/repo").expect("development config");
    assert!(config.rule_for(Path::new("index.html")).is_none());
    assert!(config.rule_for(Path::new("data/strings.json")).is_none());
}

#[test]
fn elm_sources_compile_but_elm_stuff_does_not() {
    let config = BuildConfig::development("/repo").expect("development config");
    let main = config.rule_for(Path::new("app/Main.elm")).expect("elm rule");
    assert_eq!(main.rule.name, "elm");
    assert_eq!(main.rule.uses, vec![Loader::Elm { verbose: true }]);

    let cached = config
        .rule_for(Path::new("elm-stuff/0.19.1/Main.elm"))
        .expect("catch-all");
    assert_eq!(cached.rule.name, "assets");
}

#[test]
fn relative_base_is_a_path_resolution_error() {
    let err = BuildConfig::development("repo").unwrap_err();
    assert!(matches!(err, ConfigError::PathResolution { .. }));
    assert!(err.to_string().contains("entries"));
}

#[test]
fn missing_template_path_fails_fast() {
    let mut settings = BuildSettings::development();
    settings.plugins[2] = Plugin::GenerateHtmlShell {
        template: PathBuf::new(),
    };
    let err = settings.resolve(Path::new("/repo")).unwrap_err();
    match err {
        ConfigError::PathResolution { field, .. } => {
            assert_eq!(field, "plugins.generate-html-shell.template");
        }
        other => panic!("expected PathResolution, got {other:?}"),
    }
}

#[test]
fn user_defines_keep_declaration_order_after_mode_flag() {
    let mut settings = BuildSettings::development();
    settings.defines.insert("API_URL", "/api").expect("insert");
    settings.defines.insert("process.env.NODE_ENV", "development").expect("insert");

    let config = settings.resolve(Path::new("/repo")).expect("config");
    let keys: Vec<_> = config.defines().iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["development", "API_URL", "process.env.NODE_ENV"]);
}

proptest! {
    #[test]
    fn entries_are_rooted_at_any_absolute_base(segments in prop::collection::vec("[a-z][a-z0-9_-]{0,8}", 1..5)) {
        let base = PathBuf::from(format!("/{}", segments.join("/")));
        let config = BuildConfig::development(&base).expect("development config");
        for entry in config.entries() {
            prop_assert!(entry.is_absolute());
            prop_assert!(entry.starts_with(&base));
        }
    }

    #[test]
    fn construction_is_idempotent(segments in prop::collection::vec("[a-z]{1,8}", 1..4)) {
        let base = PathBuf::from(format!("/{}", segments.join("/")));
        let first = BuildConfig::development(&base).expect("first");
        let second = BuildConfig::development(&base).expect("second");
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.to_webpack_value(), second.to_webpack_value());
    }

    #[test]
    fn every_file_has_at_most_one_winning_rule(
        dir in "[a-z]{1,6}",
        stem in "[a-z]{1,8}",
        ext in prop::sample::select(vec!["js", "css", "elm", "jpg", "jpeg", "png", "gif", "html", "json", "svg", "woff2", "txt"]),
    ) {
        let config = BuildConfig::development("/repo").expect("development config");
        let resource = PathBuf::from(format!("/repo/{dir}/{stem}.{ext}"));
        let candidates = config.rules().candidates(&resource);
        let resolved = config.rules().resolve(&resource);

        match resolved {
            Some(m) => prop_assert_eq!(m.rule, candidates[0]),
            None => prop_assert!(candidates.is_empty()),
        }
        // more than one candidate only ever means "specific rule, then catch-all"
        if candidates.len() > 1 {
            prop_assert_eq!(candidates.len(), 2);
            prop_assert!(candidates[1].is_catch_all());
        }
    }
}
