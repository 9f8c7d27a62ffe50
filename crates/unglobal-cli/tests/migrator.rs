//! End-to-end runs over real temporary directory trees.

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use unglobal_cli::Migrator;
use unglobal_core::MigratorConfig;

fn write(root: &Path, rel: &str, text: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

fn my_app_config() -> MigratorConfig {
    MigratorConfig {
        local_module_name: "my-app".to_string(),
        ..MigratorConfig::default()
    }
}

#[test]
fn migrates_a_small_tree_and_copies_assets() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(
        input.path(),
        "mixins/useful.js",
        "App.UsefulMixin = Ember.Mixin.create({});\n",
    );
    write(
        input.path(),
        "controllers/with_mixin.js",
        "App.WithMixinController = Ember.ObjectController.extend(App.UsefulMixin, {\n  someControllerProperty: 'props'\n});\n",
    );
    write(input.path(), "styles/site.css", "body { color: red; }\n");

    let migrator = Migrator::new(
        my_app_config(),
        input.path().to_path_buf(),
        output.path().to_path_buf(),
    );
    let outcome = migrator.run(false).unwrap();

    assert_eq!(outcome.report.files_split, 2);
    assert_eq!(outcome.report.units_written, 2);
    assert_eq!(outcome.report.assets_copied, 1);
    assert!(outcome.report.parse_failures.is_empty());
    assert!(outcome.report.unresolved_imports.is_empty());

    let controller = fs::read_to_string(output.path().join("controllers/with-mixin.js")).unwrap();
    assert_eq!(
        controller,
        "import Ember from 'ember';\n\
         import UsefulMixin from 'my-app/mixins/useful';\n\
         \n\
         var WithMixinController = Ember.ObjectController.extend(UsefulMixin, {\n  someControllerProperty: 'props'\n});\n\
         \n\
         export default WithMixinController;\n"
    );
    let css = fs::read_to_string(output.path().join("styles/site.css")).unwrap();
    assert_eq!(css, "body { color: red; }\n");
}

#[test]
fn parse_failure_skips_the_file_but_not_the_run() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(input.path(), "broken.js", "var s = 'unterminated\n");
    write(
        input.path(),
        "models/person.js",
        "App.Person = DS.Model.extend({});\n",
    );

    let migrator = Migrator::new(
        my_app_config(),
        input.path().to_path_buf(),
        output.path().to_path_buf(),
    );
    let outcome = migrator.run(false).unwrap();

    assert_eq!(outcome.report.files_split, 1);
    assert_eq!(outcome.report.parse_failures.len(), 1);
    assert_eq!(outcome.report.parse_failures[0].path, "broken.js");
    assert!(output.path().join("models/person.js").exists());
    assert!(!output.path().join("broken.js").exists());
}

#[test]
fn dry_run_reports_the_plan_without_writing() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(
        input.path(),
        "views/reopen.js",
        "App.ReopenView = Ember.View.extend({});\n",
    );
    write(input.path(), "assets/logo.svg", "<svg/>\n");

    let migrator = Migrator::new(
        my_app_config(),
        input.path().to_path_buf(),
        output.path().to_path_buf(),
    );
    let outcome = migrator.run(true).unwrap();

    assert_eq!(outcome.plan.len(), 1);
    assert_eq!(outcome.plan[0].destination, "views/reopen.js");
    assert_eq!(outcome.plan[0].kind.as_deref(), Some("view"));
    assert_eq!(outcome.plan[0].export_name.as_deref(), Some("ReopenView"));
    assert_eq!(outcome.report.assets_copied, 1);
    assert!(!output.path().join("views/reopen.js").exists());
    assert!(!output.path().join("assets/logo.svg").exists());
}

#[test]
fn unresolved_references_are_reported_not_fatal() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(
        input.path(),
        "controllers/lonely.js",
        "App.LonelyController = Ember.Controller.extend(App.MissingMixin, {});\n",
    );

    let migrator = Migrator::new(
        my_app_config(),
        input.path().to_path_buf(),
        output.path().to_path_buf(),
    );
    let outcome = migrator.run(false).unwrap();

    assert_eq!(outcome.report.unresolved_imports.len(), 1);
    assert_eq!(outcome.report.unresolved_imports[0].name, "MissingMixin");
    assert_eq!(
        outcome.report.unresolved_imports[0].unit,
        "controllers/lonely.js"
    );
    let module = fs::read_to_string(output.path().join("controllers/lonely.js")).unwrap();
    assert!(module.contains("App.MissingMixin"));
}

#[test]
fn toml_config_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("unglobal.toml");
    fs::write(
        &path,
        "root-namespace = \"Pos\"\nlocal-module-name = \"pos\"\n",
    )
    .unwrap();

    let config = Migrator::load_config(&path).unwrap();
    assert_eq!(config.root_namespace, "Pos");
    assert_eq!(config.local_module_name, "pos");
    assert_eq!(config.host_global, "window");
    assert_eq!(config.source_extension, "js");
    assert_eq!(config.kinds.len(), 6);
}

#[test]
fn repeated_runs_are_deterministic() {
    let input = TempDir::new().unwrap();
    write(
        input.path(),
        "models/a.js",
        "App.Alpha = DS.Model.extend({});\nApp.Beta = DS.Model.extend({});\n",
    );

    let out_one = TempDir::new().unwrap();
    let out_two = TempDir::new().unwrap();
    for out in [&out_one, &out_two] {
        Migrator::new(
            my_app_config(),
            input.path().to_path_buf(),
            out.path().to_path_buf(),
        )
        .run(false)
        .unwrap();
    }

    for rel in ["models/alpha.js", "models/beta.js"] {
        let one = fs::read_to_string(out_one.path().join(rel)).unwrap();
        let two = fs::read_to_string(out_two.path().join(rel)).unwrap();
        assert_eq!(one, two);
    }
}
