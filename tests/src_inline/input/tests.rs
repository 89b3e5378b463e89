use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use flate2::Compression;
use flate2::write::GzEncoder;

use super::reader::Delimiter;
use super::*;
use crate::model::registry::{DEFAULT_INDEX_COLUMN, DEFAULT_PERCENTILE_COLUMN, RegistryDef};
use crate::pipeline::compute_index;

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("commune_vindex_input_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_file(path: &Path, contents: &str) {
    let mut f = BufWriter::new(File::create(path).unwrap());
    f.write_all(contents.as_bytes()).unwrap();
}

fn write_gz(path: &Path, contents: &str) {
    let mut enc = GzEncoder::new(File::create(path).unwrap(), Compression::default());
    enc.write_all(contents.as_bytes()).unwrap();
    enc.finish().unwrap();
}

fn registry() -> IndicatorRegistry {
    IndicatorRegistry::from_def(RegistryDef {
        version: "input".to_string(),
        id_column: "OBJECTID".to_string(),
        name_column: "ADM3_EN".to_string(),
        index_column: DEFAULT_INDEX_COLUMN.to_string(),
        percentile_column: DEFAULT_PERCENTILE_COLUMN.to_string(),
        core_columns: vec![
            "OBJECTID".to_string(),
            "ADM3_EN".to_string(),
            "ADM3_PCODE".to_string(),
            "geometry".to_string(),
        ],
        indicator_columns: vec!["MK_DIST".to_string(), "RD_DENSUNREV".to_string()],
        reversed_columns: vec!["RD_DENSUNREV".to_string()],
        themes: Vec::new(),
        labels: Default::default(),
    })
    .unwrap()
}

const TSV: &str = "OBJECTID\tADM3_EN\tADM3_PCODE\tgeometry\tMK_DIST\tRD_DENSUNREV\tnote\n\
1\tAmbatondrazaka\tMG21101001\tPOLYGON ((0 0))\t12.5\t0.3\tok\n\
2\tAmparafaravola\tMG21102002\tPOLYGON ((1 1))\t40\t0.1\t\n\
3\tAndilamena\tMG21103003\tPOLYGON ((2 2))\tNA\t0.2\tok\n\
4\tAnosibe\tMG21104004\tPOLYGON ((3 3))\t7.25\t0.6\tok\n";

#[test]
fn test_delimiter_from_path() {
    assert_eq!(Delimiter::from_path(Path::new("a.csv")), Delimiter::Comma);
    assert_eq!(Delimiter::from_path(Path::new("a.CSV.gz")), Delimiter::Comma);
    assert_eq!(Delimiter::from_path(Path::new("a.tsv")), Delimiter::Tab);
    assert_eq!(Delimiter::from_path(Path::new("a.txt.gz")), Delimiter::Tab);
}

#[test]
fn test_delimiter_bytes() {
    assert_eq!(Delimiter::Comma.as_byte(), b',');
    assert_eq!(Delimiter::Tab.as_byte(), b'\t');
}

#[test]
fn test_load_csv_escaped_quoted_geometry() {
    let dir = make_temp_dir();
    let path = dir.join("geojson.csv");
    write_file(
        &path,
        "OBJECTID,ADM3_EN,ADM3_PCODE,geometry,MK_DIST,RD_DENSUNREV\n\
         1,Ambatondrazaka,MG21101001,\"{\"\"type\"\": \"\"Point\"\", \"\"coordinates\"\": [48.4, -17.8]}\",12.5,0.3\n\
         2,\"Amparafaravola, Nord\",MG21102002,\"POLYGON ((1 1,\n2 1, 2 2))\",40,0.1\n",
    );

    let loaded = load_table(&path, &registry()).unwrap();
    assert_eq!(loaded.table.n_rows(), 2);
    let geom = loaded.table.column_index("geometry").unwrap();
    assert_eq!(
        loaded.table.cell(0, geom),
        Some(&CellValue::Text(
            r#"{"type": "Point", "coordinates": [48.4, -17.8]}"#.to_string()
        ))
    );
    assert_eq!(
        loaded.table.cell(1, geom),
        Some(&CellValue::Text("POLYGON ((1 1,\n2 1, 2 2))".to_string()))
    );
    let name = loaded.table.column_index("ADM3_EN").unwrap();
    assert_eq!(
        loaded.table.cell(1, name),
        Some(&CellValue::Text("Amparafaravola, Nord".to_string()))
    );
}

#[test]
fn test_parse_cell() {
    assert_eq!(parse_cell("12.5", true), CellValue::Number(12.5));
    assert_eq!(parse_cell(" 3 ", true), CellValue::Number(3.0));
    assert_eq!(parse_cell("NA", true), CellValue::Missing);
    assert_eq!(parse_cell("nan", true), CellValue::Missing);
    assert_eq!(parse_cell("", false), CellValue::Missing);
    assert_eq!(parse_cell("abc", true), CellValue::Text("abc".to_string()));
    assert_eq!(
        parse_cell("MG21101001", false),
        CellValue::Text("MG21101001".to_string())
    );
    assert_eq!(parse_cell("001", false), CellValue::Text("001".to_string()));
}

#[test]
fn test_load_tsv_drops_incomplete_rows() {
    let dir = make_temp_dir();
    let path = dir.join("communes.tsv");
    write_file(&path, TSV);

    let loaded = load_table(&path, &registry()).unwrap();
    assert_eq!(loaded.n_read, 4);
    // row 3 has NA in an indicator; row 2's empty note is not a registry column
    assert_eq!(loaded.n_dropped, 1);
    assert_eq!(loaded.table.n_rows(), 3);

    let obj = loaded.table.column_index("OBJECTID").unwrap();
    let ids = loaded
        .table
        .column_values(obj)
        .cloned()
        .collect::<Vec<_>>();
    assert_eq!(
        ids,
        vec![
            CellValue::Text("1".to_string()),
            CellValue::Text("2".to_string()),
            CellValue::Text("4".to_string()),
        ]
    );

    let out = compute_index(&loaded.table, &registry(), None).unwrap();
    assert_eq!(out.n_rows(), 3);
}

#[test]
fn test_load_csv_gz() {
    let dir = make_temp_dir();
    let path = dir.join("communes.csv.gz");
    write_gz(
        &path,
        "OBJECTID,ADM3_EN,ADM3_PCODE,geometry,MK_DIST,RD_DENSUNREV\n\
         1,Ambatondrazaka,MG21101001,\"POLYGON ((0 0, 1 0, 1 1))\",12.5,0.3\n\
         2,Amparafaravola,MG21102002,\"POLYGON ((1 1, 2 1, 2 2))\",40,0.1\n",
    );

    let loaded = load_table(&path, &registry()).unwrap();
    assert_eq!(loaded.table.n_rows(), 2);
    let geom = loaded.table.column_index("geometry").unwrap();
    assert_eq!(
        loaded.table.cell(0, geom),
        Some(&CellValue::Text("POLYGON ((0 0, 1 0, 1 1))".to_string()))
    );
    let dist = loaded.table.column_index("MK_DIST").unwrap();
    assert_eq!(loaded.table.cell(1, dist), Some(&CellValue::Number(40.0)));
}

#[test]
fn test_missing_registry_column() {
    let dir = make_temp_dir();
    let path = dir.join("partial.tsv");
    write_file(&path, "OBJECTID\tADM3_EN\tMK_DIST\n1\tA\t2.0\n");
    let err = load_table(&path, &registry()).unwrap_err();
    match err {
        InputError::MissingInput(msg) => {
            assert!(msg.contains("ADM3_PCODE"));
            assert!(msg.contains("RD_DENSUNREV"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_ragged_row_is_parse_error() {
    let dir = make_temp_dir();
    let path = dir.join("ragged.tsv");
    write_file(
        &path,
        "OBJECTID\tADM3_EN\tADM3_PCODE\tgeometry\tMK_DIST\tRD_DENSUNREV\n1\tA\tP\tG\t2.0\n",
    );
    let err = load_table(&path, &registry()).unwrap_err();
    assert!(matches!(err, InputError::Parse(msg) if msg.contains("line 2")));
}

#[test]
fn test_empty_file() {
    let dir = make_temp_dir();
    let path = dir.join("empty.tsv");
    write_file(&path, "");
    assert!(matches!(
        load_table(&path, &registry()),
        Err(InputError::Parse(_))
    ));
}
