//! List command integration tests

mod common;

use predicates::prelude::*;

use common::{TestWorkspace, path_arg, tythe_cmd_for_workspace};

#[test]
fn test_list_shows_transitive_dependencies() {
    let workspace = TestWorkspace::new();
    let root = workspace.create_npm_package("app", &["left", "right"]);
    workspace.create_npm_package("left", &["shared"]);
    workspace.create_npm_package("right", &["shared"]);
    workspace.create_npm_package("shared", &[]);
    workspace.accept_usdc("shared");
    workspace.accept_paypal("left");

    tythe_cmd_for_workspace(&workspace)
        .args(["list", &path_arg(&root)])
        .assert()
        .success()
        .stdout(predicate::str::contains("Package: app"))
        .stdout(predicate::str::contains("Dependencies (3, 2 accepting donations):"))
        .stdout(predicate::str::contains(format!(
            "shared  USDC {}",
            common::USDC_ADDRESS
        )))
        .stdout(predicate::str::contains(format!(
            "left  PayPal {}",
            common::PAYPAL_ACCOUNT
        )))
        .stdout(predicate::str::contains("right  no tythe.json"));
}

#[test]
fn test_list_output_is_sorted() {
    let workspace = TestWorkspace::new();
    let root = workspace.create_npm_package("app", &["zeta", "alpha", "mid"]);
    workspace.create_npm_package("zeta", &[]);
    workspace.create_npm_package("alpha", &[]);
    workspace.create_npm_package("mid", &[]);

    let output = tythe_cmd_for_workspace(&workspace)
        .args(["list", &path_arg(&root)])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();

    let alpha = stdout.find("  alpha").unwrap();
    let mid = stdout.find("  mid").unwrap();
    let zeta = stdout.find("  zeta").unwrap();
    assert!(alpha < mid && mid < zeta);
}

#[test]
fn test_list_detailed_shows_parent() {
    let workspace = TestWorkspace::new();
    let root = workspace.create_npm_package("app", &["lib"]);
    workspace.create_npm_package("lib", &[]);

    tythe_cmd_for_workspace(&workspace)
        .args(["list", &path_arg(&root), "--detailed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Required by: app"))
        .stdout(predicate::str::contains("Ecosystem: npm"));
}

#[test]
fn test_list_reports_missing_dependency() {
    let workspace = TestWorkspace::new();
    let root = workspace.create_npm_package("app", &["present", "gone"]);
    workspace.create_npm_package("present", &[]);

    tythe_cmd_for_workspace(&workspace)
        .args(["list", &path_arg(&root)])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dependencies (1, 0 accepting donations):"))
        .stdout(predicate::str::contains("Not crawled (1):"))
        .stdout(predicate::str::contains("gone (required by app)"));
}

#[test]
fn test_list_package_without_dependencies() {
    let workspace = TestWorkspace::new();
    let root = workspace.create_npm_package("solo", &[]);

    tythe_cmd_for_workspace(&workspace)
        .args(["list", &path_arg(&root)])
        .assert()
        .success()
        .stdout(predicate::str::contains("No dependencies found."));
}

#[test]
fn test_list_go_module_with_local_replace() {
    let workspace = TestWorkspace::new();
    workspace.write_file(
        "svc/go.mod",
        "module example.com/svc\n\ngo 1.22\n\nrequire example.com/util v0.0.0\n\nreplace example.com/util => ../util\n",
    );
    workspace.write_file("util/go.mod", "module example.com/util\n\ngo 1.22\n");
    workspace.accept_usdc("util");

    tythe_cmd_for_workspace(&workspace)
        .args(["list", &path_arg(&workspace.path.join("svc"))])
        .assert()
        .success()
        .stdout(predicate::str::contains("Package: example.com/svc"))
        .stdout(predicate::str::contains("example.com/util  USDC"));
}

#[test]
fn test_list_missing_root_fails() {
    let workspace = TestWorkspace::new();

    tythe_cmd_for_workspace(&workspace)
        .args(["list", &path_arg(&workspace.path.join("nowhere"))])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_list_invalid_config_treated_as_unconfigured() {
    let workspace = TestWorkspace::new();
    let root = workspace.create_npm_package("app", &["lib"]);
    workspace.create_npm_package("lib", &[]);
    workspace.write_tythe_json("lib", "{\"usdcAddress\": \"not-an-address\"}");

    tythe_cmd_for_workspace(&workspace)
        .args(["list", &path_arg(&root)])
        .assert()
        .success()
        .stdout(predicate::str::contains("lib  no tythe.json"));
}
