//! External command payment backend
//!
//! Runs a user-supplied program once per destination:
//!
//! ```text
//! <program> [args...] <address> <amount>
//! ```
//!
//! with `TYTHE_METHOD` (`usdc` or `paypal`) and `TYTHE_SANDBOX` (`1` or `0`)
//! in its environment. The amount has six decimal places. The last line the
//! non-blank line the program prints on stdout is taken as the transaction
//! id. A non-zero exit status, or a clean exit with nothing on stdout, fails
//! that payment.

use std::collections::BTreeMap;
use std::process::Command;

use tracing::debug;

use crate::domain::PaymentMethod;
use crate::error::{Result, payment as payment_error};

use super::{PaymentBackend, PaymentResult};

/// Backend delegating each transfer to an external program
#[derive(Debug, Clone)]
pub struct CommandBackend {
    method: PaymentMethod,
    program: String,
    args: Vec<String>,
}

impl CommandBackend {
    /// Build from a command line such as `wallet-cli send --network base`
    ///
    /// Words are split on whitespace; there is no shell quoting.
    pub fn from_command_line(method: PaymentMethod, line: &str) -> Result<Self> {
        let mut words = line.split_whitespace().map(str::to_string);
        let Some(program) = words.next() else {
            return Err(payment_error::backend_missing(method.to_string()));
        };
        Ok(Self {
            method,
            program,
            args: words.collect(),
        })
    }

    fn send_one(&self, address: &str, amount: f64, sandbox: bool) -> PaymentResult {
        let amount_arg = format!("{amount:.6}");
        debug!(program = %self.program, address, amount = %amount_arg, sandbox, "running payment command");

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(address)
            .arg(&amount_arg)
            .env("TYTHE_METHOD", self.method.as_arg())
            .env("TYTHE_SANDBOX", if sandbox { "1" } else { "0" })
            .output();

        let fail = |reason: String| {
            PaymentResult::failure(
                self.method,
                address,
                amount,
                payment_error::failed(self.method.to_string(), address, amount, reason),
            )
        };

        match output {
            Err(e) => fail(format!("could not run '{}': {e}", self.program)),
            Ok(output) if !output.status.success() => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                let detail = stderr.trim();
                if detail.is_empty() {
                    fail(format!("'{}' exited with {}", self.program, output.status))
                } else {
                    fail(detail.to_string())
                }
            }
            Ok(output) => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                match stdout.lines().map(str::trim).rfind(|line| !line.is_empty()) {
                    Some(transaction_id) => PaymentResult::success(
                        self.method,
                        address,
                        amount,
                        transaction_id.to_string(),
                    ),
                    None => fail(format!("'{}' printed no transaction id", self.program)),
                }
            }
        }
    }
}

impl PaymentBackend for CommandBackend {
    fn method(&self) -> PaymentMethod {
        self.method
    }

    fn send_batch(
        &self,
        payments: &BTreeMap<String, f64>,
        sandbox: bool,
    ) -> Result<Vec<PaymentResult>> {
        Ok(payments
            .iter()
            .map(|(address, &amount)| self.send_one(address, amount, sandbox))
            .collect())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::error::TytheError;
    use tempfile::TempDir;

    const A: &str = "0x52908400098527886E0F7030069857D2E4169EE7";

    fn script(dir: &TempDir, body: &str) -> String {
        let path = dir.path().join("pay.sh");
        std::fs::write(&path, body).unwrap();
        format!("sh {}", path.display())
    }

    #[test]
    fn test_transaction_id_from_stdout() {
        let temp = TempDir::new().unwrap();
        let line = script(
            &temp,
            "echo starting\nprintf 'tx-%s-%s-%s-%s\\n' \"$TYTHE_METHOD\" \"$TYTHE_SANDBOX\" \"$1\" \"$2\"\n",
        );
        let backend = CommandBackend::from_command_line(PaymentMethod::Usdc, &line).unwrap();

        let payments = BTreeMap::from([(A.to_string(), 1.5)]);
        let results = backend.send_batch(&payments, true).unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].outcome, Ok(format!("tx-usdc-1-{A}-1.500000")));
    }

    #[test]
    fn test_non_zero_exit_fails_payment() {
        let temp = TempDir::new().unwrap();
        let line = script(&temp, "echo 'insufficient funds' >&2\nexit 3\n");
        let backend = CommandBackend::from_command_line(PaymentMethod::PayPal, &line).unwrap();

        let payments = BTreeMap::from([("dev@example.com".to_string(), 2.0)]);
        let results = backend.send_batch(&payments, false).unwrap();

        match &results[0].outcome {
            Err(TytheError::PaymentFailed { reason, .. }) => {
                assert_eq!(reason, "insufficient funds");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_silent_success_fails_payment() {
        let temp = TempDir::new().unwrap();
        let line = script(&temp, "echo '   '\nexit 0\n");
        let backend = CommandBackend::from_command_line(PaymentMethod::Usdc, &line).unwrap();

        let payments = BTreeMap::from([(A.to_string(), 1.0)]);
        let results = backend.send_batch(&payments, false).unwrap();

        match &results[0].outcome {
            Err(TytheError::PaymentFailed { reason, .. }) => {
                assert!(reason.contains("no transaction id"), "{reason}");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_missing_program_fails_payment() {
        let backend =
            CommandBackend::from_command_line(PaymentMethod::Usdc, "/no/such/payment-program")
                .unwrap();
        let payments = BTreeMap::from([(A.to_string(), 1.0)]);
        let results = backend.send_batch(&payments, false).unwrap();
        assert!(!results[0].is_success());
    }

    #[test]
    fn test_empty_command_line() {
        assert!(CommandBackend::from_command_line(PaymentMethod::Usdc, "  ").is_err());
    }
}
