//! Integration tests for the `dian` binary, fed with JSON page dumps.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_dian"))
}

fn item(seq: &str, price: &str, discount: &str, vat: &str) -> serde_json::Value {
    json!([seq, "C1", "Producto", "UND", "1", price, discount, "0", "0", vat, "0", "0", price])
}

fn write_sale(dir: &Path, name: &str) -> PathBuf {
    let dump = json!({
        "pages": [{
            "text": "Factura Electrónica de Venta\n\
                     Razón Social: DISTRIBUIDORA EL SOL S.A.S Nombre Comercial: EL SOL\n\
                     Nit del Emisor: 900555111 País: Colombia\n\
                     Fecha de Emisión: 02/03/2024 Medio de Pago: Efectivo\n\
                     Número de Factura: SETP-88 Forma de pago: Contado\n\
                     Datos Totales\nIVA $ 19.000,00",
            "tables": [[
                item("1", "100.000,00", "0", "19"),
                item("2", "20.000,00", "0", "0"),
            ]]
        }]
    });
    let path = dir.join(name);
    fs::write(&path, dump.to_string()).unwrap();
    path
}

fn write_purchase(dir: &Path, name: &str) -> PathBuf {
    let dump = json!({
        "pages": [{
            "text": "Factura de Compra Electrónica\n\
                     Nombre o Razón Social: TIENDA LA ESQUINA Tipo de Documento: NIT\n\
                     Nit del Emisor: 901222333 País: Colombia\n\
                     Fecha de Emisión: 10/04/2024 Medio de Pago: Crédito\n\
                     Número de Factura: FC-9 Forma de pago: Crédito",
            "tables": [[
                item("1", "50.000", "3.000", "19"),
                item("2", "30.000", "2.000", "5"),
            ]]
        }]
    });
    let path = dir.join(name);
    fs::write(&path, dump.to_string()).unwrap();
    path
}

#[test]
fn test_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("process"))
        .stdout(predicate::str::contains("batch"))
        .stdout(predicate::str::contains("classify"));
}

#[test]
fn test_process_csv() {
    let dir = TempDir::new().unwrap();
    let input = write_sale(dir.path(), "venta.json");

    cli()
        .arg("process")
        .arg(&input)
        .args(["--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Razón Social,Tipo Documento"))
        .stdout(predicate::str::contains("DISTRIBUIDORA EL SOL S.A.S,Factura de Venta"))
        .stdout(predicate::str::contains("100000.00"))
        .stdout(predicate::str::contains("20000.00"));
}

#[test]
fn test_process_json_letter_keys() {
    let dir = TempDir::new().unwrap();
    let input = write_sale(dir.path(), "venta.json");

    let output = cli().arg("process").arg(&input).output().unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["document_type"], "Factura de Venta");

    let rows = report["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().any(|r| r["F"] == "001" && r["J"] == "100000.00"));
    assert!(rows.iter().any(|r| r["F"] == "003" && r["J"] == "20000.00"));
    assert!(rows.iter().all(|r| r["P"] == "19000.00"));
}

#[test]
fn test_process_purchase_discount_row() {
    let dir = TempDir::new().unwrap();
    let input = write_purchase(dir.path(), "compra.json");

    cli()
        .arg("process")
        .arg(&input)
        .args(["--type", "compra", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"F\": \"42104001\""))
        .stdout(predicate::str::contains("\"G\": \"5000\""));
}

#[test]
fn test_process_inventory() {
    let dir = TempDir::new().unwrap();
    let input = write_purchase(dir.path(), "compra.json");

    cli()
        .arg("process")
        .arg(&input)
        .args(["--inventory", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("NIT Emisor,Número Factura"))
        .stdout(predicate::str::contains("901222333,FC-9,1,C1,Producto"));
}

#[test]
fn test_process_missing_file() {
    cli()
        .args(["process", "/nonexistent/factura.pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_process_unreadable_pdf() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("roto.pdf");
    fs::write(&input, b"not a pdf").unwrap();

    cli()
        .arg("process")
        .arg(&input)
        .args(["--type", "venta"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to process"));
}

#[test]
fn test_classify() {
    let dir = TempDir::new().unwrap();
    let sale = write_sale(dir.path(), "venta.json");
    let purchase = write_purchase(dir.path(), "compra.json");

    cli()
        .arg("classify")
        .arg(&sale)
        .arg(&purchase)
        .assert()
        .success()
        .stdout(predicate::str::contains("Factura de Venta"))
        .stdout(predicate::str::contains("Factura de Compra"));
}

#[test]
fn test_batch_writes_buckets() {
    let input_dir = TempDir::new().unwrap();
    let output_dir = TempDir::new().unwrap();
    write_sale(input_dir.path(), "a_venta.json");
    write_purchase(input_dir.path(), "b_compra.json");
    fs::write(input_dir.path().join("c_roto.pdf"), b"not a pdf").unwrap();

    cli()
        .arg("batch")
        .arg(input_dir.path())
        .arg("-o")
        .arg(output_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 3 files"))
        .stdout(predicate::str::contains("2 successful, 1 failed"));

    let out = output_dir.path();
    for name in ["venta.csv", "compra.csv", "descuentos.csv", "inventario.csv", "errores.csv"] {
        assert!(out.join(name).exists(), "{} missing", name);
    }
    assert!(!out.join("gastos.csv").exists());

    let errors = fs::read_to_string(out.join("errores.csv")).unwrap();
    assert!(errors.contains("c_roto.pdf"));

    let discounts = fs::read_to_string(out.join("descuentos.csv")).unwrap();
    assert!(discounts.contains("42104001"));
}

#[test]
fn test_config_init_and_get() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");

    cli()
        .arg("--config")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .success();
    assert!(config.exists());

    cli()
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "export.delimiter", ";"])
        .assert()
        .success();

    cli()
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "export.delimiter"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\";\""));
}
