//! Shared test infrastructure for integration tests.

use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

pub const LANDING: &str = "orders-input";
pub const PROCESSING: &str = "orders-processing";
pub const TABLE: &str = "customer-data-pipeline-metadata-db";

pub const CUSTOMERS_JSON: &str =
    r#"[{"customer_id":"c1","name":"Alice"},{"customer_id":"c2","name":"Bob"}]"#;
pub const CATALOG_CSV: &str = "product_id,name,price\np1,Widget,9.99\np2,Gadget,24.50\n";

/// A temporary data root with buckets laid out as directories.
pub struct DataRoot {
    pub dir: TempDir,
}

impl DataRoot {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write_object(&self, bucket: &str, key: &str, body: &str) {
        let path = self.path().join(bucket).join(key);
        std::fs::create_dir_all(path.parent().expect("object parent")).expect("create bucket");
        std::fs::write(&path, body).expect("write object");
    }

    pub fn read_object(&self, bucket: &str, key: &str) -> Option<String> {
        std::fs::read_to_string(self.path().join(bucket).join(key)).ok()
    }

    /// Land both reference files and run them through the validate stage.
    pub fn stage_references(&self) {
        for (key, body) in [
            ("customers.json", CUSTOMERS_JSON),
            ("product_catalog.csv", CATALOG_CSV),
        ] {
            self.write_object(LANDING, key, body);
            let output = self.run(&["validate", "--bucket", LANDING, "--key", key]);
            assert!(output.status.success(), "stage {key}: {}", stderr(&output));
        }
    }

    pub fn run(&self, args: &[&str]) -> Output {
        self.run_with_stdin(args, None)
    }

    pub fn run_with_stdin(&self, args: &[&str], stdin: Option<&str>) -> Output {
        use std::io::Write;

        let mut child = Command::new(env!("CARGO_BIN_EXE_orderflow"))
            .arg("--root")
            .arg(self.path())
            .args(args)
            .env_remove("RUST_LOG")
            .env_remove("ORDERFLOW_ROOT")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("spawn orderflow");
        {
            let mut pipe = child.stdin.take().expect("stdin pipe");
            if let Some(input) = stdin {
                pipe.write_all(input.as_bytes()).expect("write stdin");
            }
        }
        child.wait_with_output().expect("wait for orderflow")
    }
}

pub fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|err| {
        panic!(
            "stdout is not JSON ({err}): {}",
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
