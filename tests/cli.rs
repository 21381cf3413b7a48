mod common;

use common::{TestWorkspace, cli};
use csv_import_options::{OptionCollection, OptionKind};
use predicates::str::contains;

const SAMPLE_CSV: &str = "id,price,active,ordered_at,elapsed,note\n\
1,12.5,true,2024-01-02,01:02:03,first\n\
2,7,FALSE,2024-02-03 10:00,00:00:59.5,second\n\
3,,true,2024-03-04,10:00:00,\n";

#[test]
fn detect_writes_one_record_per_column() {
    let workspace = TestWorkspace::new();
    let csv_path = workspace.write("sample.csv", SAMPLE_CSV);
    let meta_path = workspace.join("options.yaml");

    cli()
        .args(["detect", "-i"])
        .arg(&csv_path)
        .arg("-m")
        .arg(&meta_path)
        .assert()
        .success();

    let options = OptionCollection::load(&meta_path).expect("load detected options");
    let kinds = options.iter().map(|record| record.kind()).collect::<Vec<_>>();
    assert_eq!(
        kinds,
        [
            OptionKind::Numeric,
            OptionKind::Numeric,
            OptionKind::Logical,
            OptionKind::Datetime,
            OptionKind::Duration,
            OptionKind::Text,
        ]
    );
    assert_eq!(options[5].name(), "note");
}

#[test]
fn detect_honours_delimiter_and_names_blank_headers() {
    let workspace = TestWorkspace::new();
    let csv_path = workspace.write("sample.txt", "a;\nx;1\n");
    let meta_path = workspace.join("options.json");

    cli()
        .args(["detect", "--delimiter", ";", "-i"])
        .arg(&csv_path)
        .arg("-m")
        .arg(&meta_path)
        .assert()
        .success();

    let options = OptionCollection::load(&meta_path).expect("load detected options");
    assert_eq!(options.names(), ["a", "Var2"]);
    assert_eq!(options[1].type_name(), "double");
}

#[test]
fn detect_stops_reading_at_sample_limit() {
    let workspace = TestWorkspace::new();
    let csv_path = workspace.write("sample.csv", "id,flag\n1,true\n2,false\n3,true,extra\n");
    let meta_path = workspace.join("options.yaml");

    cli()
        .args(["detect", "--sample-rows", "2", "-i"])
        .arg(&csv_path)
        .arg("-m")
        .arg(&meta_path)
        .assert()
        .success();
    let options = OptionCollection::load(&meta_path).expect("load detected options");
    assert_eq!(options[1].kind(), OptionKind::Logical);

    cli()
        .args(["detect", "--sample-rows", "0", "-i"])
        .arg(&csv_path)
        .arg("-m")
        .arg(&meta_path)
        .assert()
        .failure()
        .stderr(contains("Reading row 4"));
}

#[test]
fn reclassify_by_name_and_position_updates_file() {
    let workspace = TestWorkspace::new();
    let csv_path = workspace.write("sample.csv", SAMPLE_CSV);
    let meta_path = workspace.join("options.yaml");
    cli()
        .args(["detect", "-i"])
        .arg(&csv_path)
        .arg("-m")
        .arg(&meta_path)
        .assert()
        .success();

    cli()
        .args(["reclassify", "-m"])
        .arg(&meta_path)
        .args(["-p", "6", "-C", "id", "-t", "categorical,int32"])
        .assert()
        .success();

    let options = OptionCollection::load(&meta_path).expect("reload options");
    assert_eq!(options[0].type_name(), "int32");
    assert_eq!(options[5].kind(), OptionKind::Categorical);
    assert_eq!(options[5].name(), "note");
}

#[test]
fn reclassify_with_unsupported_type_leaves_file_untouched() {
    let workspace = TestWorkspace::new();
    let meta_path = workspace.write(
        "options.yaml",
        "variables:\n  - kind: numeric\n    name: a\n    type: double\n  - kind: text\n    name: b\n    type: char\n",
    );
    let before = workspace.read("options.yaml");

    cli()
        .args(["reclassify", "-m"])
        .arg(&meta_path)
        .args(["-p", "1,2", "-t", "string,foo"])
        .assert()
        .failure()
        .stderr(contains("Unable to convert to type 'foo'"));

    assert_eq!(workspace.read("options.yaml"), before);
}

#[test]
fn reclassify_rejects_unpaired_types() {
    let workspace = TestWorkspace::new();
    let meta_path = workspace.write(
        "options.yaml",
        "variables:\n  - kind: text\n    name: a\n    type: char\n",
    );

    cli()
        .args(["reclassify", "-m"])
        .arg(&meta_path)
        .args(["-p", "1", "-t", "string,char"])
        .assert()
        .failure()
        .stderr(contains("got 1 position(s) and 2 type(s)"));
}

#[test]
fn compare_reports_equivalence_and_differences() {
    let workspace = TestWorkspace::new();
    let left = workspace.write(
        "left.yaml",
        "variables:\n  - kind: text\n    name: a\n    type: char\n  - kind: numeric\n    name: b\n    type: double\n",
    );
    let renamed = workspace.write(
        "renamed.yaml",
        "variables:\n  - kind: text\n    name: other\n    type: char\n  - kind: numeric\n    name: b\n    type: double\n    fill_value: 3\n",
    );
    let retyped = workspace.write(
        "retyped.yaml",
        "variables:\n  - kind: text\n    name: a\n    type: char\n  - kind: numeric\n    name: b\n    type: single\n",
    );

    cli()
        .arg("compare")
        .arg(&left)
        .arg(&renamed)
        .assert()
        .success()
        .stdout(contains("equivalent"));

    cli()
        .arg("compare")
        .arg(&left)
        .arg(&retyped)
        .assert()
        .failure()
        .stdout(contains("variable 2: 'b' (double) differs from 'b' (single)"))
        .stderr(contains("Options differ at 1 position(s)"));
}

#[test]
fn normalize_cleans_fields_with_column_options() {
    let workspace = TestWorkspace::new();
    let csv_path = workspace.write(
        "raw.csv",
        "amount,label\n\"$1,5\",\"say \"\"hi\"\"\"\nNA,\n",
    );
    let meta_path = workspace.write(
        "options.yaml",
        "variables:\n  - kind: numeric\n    name: amount\n    type: double\n    prefixes: $\n    treat_as_missing: NA\n  - kind: text\n    name: label\n    type: string\n    empty_field_rule: auto\n",
    );
    let out_path = workspace.join("clean.csv");

    cli()
        .args(["normalize", "--delimiter", ";", "--missing-token", "<NA>", "-i"])
        .arg(&csv_path)
        .arg("-m")
        .arg(&meta_path)
        .arg("-o")
        .arg(&out_path)
        .assert()
        .failure()
        .stderr(contains("has 1 column(s)"));

    let csv_path = workspace.write(
        "raw.csv",
        "amount,label\n\"$15\",\"say \"\"hi\"\"\"\nNA,\n",
    );
    cli()
        .args(["normalize", "--missing-token", "<NA>", "-i"])
        .arg(&csv_path)
        .arg("-m")
        .arg(&meta_path)
        .arg("-o")
        .arg(&out_path)
        .assert()
        .success();

    let cleaned = workspace.read("clean.csv");
    let lines = cleaned.lines().collect::<Vec<_>>();
    assert_eq!(lines[0], "amount,label");
    assert_eq!(lines[1], "15,\"say \"\"hi\"\"\"");
    assert_eq!(lines[2], "<NA>,");
}

#[test]
fn normalize_stops_on_quote_rule_violation() {
    let workspace = TestWorkspace::new();
    let csv_path = workspace.write("raw.csv", "code\n\"A1\"\n");
    let meta_path = workspace.write(
        "options.yaml",
        "variables:\n  - kind: text\n    name: code\n    type: char\n    quote_rule: error\n",
    );

    cli()
        .args(["normalize", "-i"])
        .arg(&csv_path)
        .arg("-m")
        .arg(&meta_path)
        .assert()
        .failure()
        .stderr(contains("Column 'code'"))
        .stderr(contains("quote rule is 'error'"));
}
