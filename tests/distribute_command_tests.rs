//! Distribute command integration tests

mod common;

use predicates::prelude::*;

use common::{
    PAYPAL_ACCOUNT, TestWorkspace, USDC_ADDRESS, USDC_CHECKSUM_ADDRESS, path_arg,
    tythe_cmd_for_workspace,
};

/// app -> left (PayPal), right (nothing), shared (USDC, reached twice)
fn three_dependency_workspace() -> (TestWorkspace, String) {
    let workspace = TestWorkspace::new();
    let root = workspace.create_npm_package("app", &["left", "right"]);
    workspace.create_npm_package("left", &["shared"]);
    workspace.create_npm_package("right", &["shared"]);
    workspace.create_npm_package("shared", &[]);
    workspace.accept_paypal("left");
    workspace.accept_usdc("shared");
    let root = path_arg(&root);
    (workspace, root)
}

#[test]
fn test_dry_run_prints_plan() {
    let (workspace, root) = three_dependency_workspace();

    tythe_cmd_for_workspace(&workspace)
        .args(["distribute", &root, "--amount", "90", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Distributing $90.00 across 3 dependencies (2 accept donations):",
        ))
        .stdout(predicate::str::contains("USDC:"))
        .stdout(predicate::str::contains("PayPal:"))
        .stdout(predicate::str::contains(format!("$30.00  {USDC_ADDRESS}")))
        .stdout(predicate::str::contains(format!("$30.00  {PAYPAL_ACCOUNT}")))
        .stdout(predicate::str::contains("Total: $60.00"))
        .stdout(predicate::str::contains("Not distributed (no tythe.json): $30.00"))
        .stdout(predicate::str::contains("Dry run, nothing was sent."));

    assert!(!workspace.file_exists("usdc.log"));
}

#[test]
fn test_dollar_prefixed_amount() {
    let (workspace, root) = three_dependency_workspace();

    tythe_cmd_for_workspace(&workspace)
        .args(["distribute", &root, "--amount", "$9", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: $6.00"));
}

#[test]
fn test_shared_address_is_paid_once() {
    let workspace = TestWorkspace::new();
    let root = workspace.create_npm_package("app", &["a", "b"]);
    workspace.create_npm_package("a", &[]);
    workspace.create_npm_package("b", &[]);
    workspace.accept_usdc("a");
    workspace.accept_usdc("b");

    tythe_cmd_for_workspace(&workspace)
        .args(["distribute", &path_arg(&root), "--amount", "10", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("$10.00  {USDC_ADDRESS}")))
        .stdout(predicate::str::contains("Total: $10.00"))
        .stdout(predicate::str::contains("Not distributed").not());
}

#[test]
fn test_address_spellings_are_paid_once() {
    let workspace = TestWorkspace::new();
    let root = workspace.create_npm_package("app", &["a", "b"]);
    workspace.create_npm_package("a", &[]);
    workspace.create_npm_package("b", &[]);
    workspace.accept_usdc("a");
    workspace.write_tythe_json("b", &format!("{{\"usdcAddress\": \"{USDC_CHECKSUM_ADDRESS}\"}}"));

    tythe_cmd_for_workspace(&workspace)
        .args(["distribute", &path_arg(&root), "--amount", "10", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("$10.00  {USDC_ADDRESS}")))
        .stdout(predicate::str::contains(USDC_CHECKSUM_ADDRESS).not());
}

#[cfg(unix)]
#[test]
fn test_pays_through_command_backends() {
    let (workspace, root) = three_dependency_workspace();
    let usdc = workspace.payment_script("usdc", false);
    let paypal = workspace.payment_script("paypal", false);

    tythe_cmd_for_workspace(&workspace)
        .args([
            "distribute",
            &root,
            "--amount",
            "90",
            "--yes",
            "--usdc-command",
            &usdc,
            "--paypal-command",
            &paypal,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Payments:"))
        .stdout(predicate::str::contains(format!("tx-{USDC_ADDRESS}")))
        .stdout(predicate::str::contains(format!("tx-{PAYPAL_ACCOUNT}")));

    assert_eq!(
        workspace.read_file("usdc.log").trim(),
        format!("{USDC_ADDRESS} 30.000000 0")
    );
    assert_eq!(
        workspace.read_file("paypal.log").trim(),
        format!("{PAYPAL_ACCOUNT} 30.000000 0")
    );
}

#[cfg(unix)]
#[test]
fn test_sandbox_is_passed_to_backend() {
    let (workspace, root) = three_dependency_workspace();
    let usdc = workspace.payment_script("usdc", false);
    let paypal = workspace.payment_script("paypal", false);

    tythe_cmd_for_workspace(&workspace)
        .env("TYTHE_USDC_COMMAND", &usdc)
        .env("TYTHE_PAYPAL_COMMAND", &paypal)
        .args(["distribute", &root, "--amount", "90", "--yes", "--sandbox"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Payments (sandbox):"));

    assert!(workspace.read_file("usdc.log").trim().ends_with(" 1"));
}

#[cfg(unix)]
#[test]
fn test_failed_payment_exits_with_error() {
    let (workspace, root) = three_dependency_workspace();
    let usdc = workspace.payment_script("usdc", true);
    let paypal = workspace.payment_script("paypal", false);

    tythe_cmd_for_workspace(&workspace)
        .args([
            "distribute",
            &root,
            "--amount",
            "90",
            "--yes",
            "--usdc-command",
            &usdc,
            "--paypal-command",
            &paypal,
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("insufficient funds"))
        .stdout(predicate::str::contains(format!("tx-{PAYPAL_ACCOUNT}")))
        .stderr(predicate::str::contains("1 of 2 payments failed"));
}

#[test]
fn test_missing_backends_fail_every_payment() {
    let (workspace, root) = three_dependency_workspace();

    tythe_cmd_for_workspace(&workspace)
        .args(["distribute", &root, "--amount", "90", "--yes"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("No payment backend configured for USDC"))
        .stderr(predicate::str::contains("2 of 2 payments failed"));
}

#[test]
fn test_nothing_to_pay_when_no_dependency_accepts() {
    let workspace = TestWorkspace::new();
    let root = workspace.create_npm_package("app", &["plain"]);
    workspace.create_npm_package("plain", &[]);

    tythe_cmd_for_workspace(&workspace)
        .args(["distribute", &path_arg(&root), "--amount", "50", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: $0.00"))
        .stdout(predicate::str::contains("Nothing to pay."));
}

#[test]
fn test_no_dependencies_is_an_error() {
    let workspace = TestWorkspace::new();
    let root = workspace.create_npm_package("solo", &[]);

    tythe_cmd_for_workspace(&workspace)
        .args(["distribute", &path_arg(&root), "--amount", "50", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no dependencies to weigh"));
}

#[test]
fn test_uncrawlable_dependency_is_left_out() {
    let workspace = TestWorkspace::new();
    let root = workspace.create_npm_package("app", &["there", "missing"]);
    workspace.create_npm_package("there", &[]);
    workspace.accept_usdc("there");

    tythe_cmd_for_workspace(&workspace)
        .args(["distribute", &path_arg(&root), "--amount", "20", "--dry-run"])
        .assert()
        .success()
        .stderr(predicate::str::contains("1 package(s) could not be crawled"))
        .stdout(predicate::str::contains("Total: $20.00"));
}
