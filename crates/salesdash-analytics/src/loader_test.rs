use std::io::Write;

use salesdash_core::DEFAULT_CUSTOMER_SEGMENT;

use super::*;

const HEADER: &str = "order_id,customer_city,customer_segment,order_purchase_timestamp,total_price,review_score,product_category_name_english";

fn csv_with(rows: &[&str]) -> String {
    let mut out = String::from(HEADER);
    for row in rows {
        out.push('\n');
        out.push_str(row);
    }
    out.push('\n');
    out
}

#[test]
fn parses_valid_rows_and_ignores_extra_columns() {
    let data = csv_with(&[
        "a1,sao paulo,High Value Customers,2017-10-02 10:56:33,38.71,4,housewares",
        "a2,rio de janeiro,Mid Value Customers,2018-07-24 20:41:37,141.46,5.0,perfumery",
    ]);
    let (dataset, report) = read_dataset(data.as_bytes()).unwrap();

    assert_eq!(report.total_rows, 2);
    assert_eq!(report.loaded_rows, 2);
    assert!(report.rejected.is_empty());

    let first = &dataset.records()[0];
    assert_eq!(first.customer_city, "sao paulo");
    assert_eq!(first.customer_segment.as_deref(), Some("High Value Customers"));
    assert_eq!(first.order_purchase_timestamp.to_string(), "2017-10-02 10:56:33");
    assert_eq!(first.total_price, Decimal::new(3871, 2));
    assert_eq!(first.review_score, Some(Decimal::from(4)));
    assert_eq!(first.product_category_name_english, "housewares");
}

#[test]
fn fills_missing_segment_with_default() {
    let data = csv_with(&[
        "a1,sao paulo,,2017-10-02 10:56:33,38.71,4,housewares",
        "a2,sao paulo,NaN,2017-10-03 10:56:33,10.00,4,housewares",
        "a3,sao paulo,High Value Customers,2017-10-04 10:56:33,10.00,4,housewares",
    ]);
    let (dataset, report) = read_dataset(data.as_bytes()).unwrap();

    assert_eq!(report.segments_filled, 2);
    let segments: Vec<_> = dataset
        .records()
        .iter()
        .map(|r| r.customer_segment.as_deref())
        .collect();
    assert_eq!(
        segments,
        vec![
            Some(DEFAULT_CUSTOMER_SEGMENT),
            Some(DEFAULT_CUSTOMER_SEGMENT),
            Some("High Value Customers"),
        ]
    );
}

#[test]
fn loading_same_input_twice_fills_identically() {
    let data = csv_with(&[
        "a1,sao paulo,,2017-10-02 10:56:33,38.71,4,housewares",
        "a2,rio,Low Value Customers,2017-10-03 10:56:33,10.00,,toys",
    ]);
    let (first, _) = read_dataset(data.as_bytes()).unwrap();
    let (mut second, _) = read_dataset(data.as_bytes()).unwrap();
    assert_eq!(first, second);
    assert_eq!(second.fill_missing_segments(), 0);
    assert_eq!(first, second);
}

#[test]
fn missing_review_score_is_null_not_zero() {
    let data = csv_with(&["a1,sao paulo,Mid Value Customers,2017-10-02 10:56:33,38.71,,toys"]);
    let (dataset, _) = read_dataset(data.as_bytes()).unwrap();
    assert_eq!(dataset.records()[0].review_score, None);
}

#[test]
fn missing_category_becomes_unknown() {
    let data = csv_with(&["a1,sao paulo,Mid Value Customers,2017-10-02 10:56:33,38.71,3,"]);
    let (dataset, _) = read_dataset(data.as_bytes()).unwrap();
    assert_eq!(
        dataset.records()[0].product_category_name_english,
        UNKNOWN_PRODUCT_CATEGORY
    );
}

#[test]
fn rejects_row_with_bad_timestamp_and_keeps_others() {
    let data = csv_with(&[
        "a1,sao paulo,Mid Value Customers,not-a-date,38.71,4,toys",
        "a2,sao paulo,Mid Value Customers,2017-10-02 10:56:33,20.00,4,toys",
    ]);
    let (dataset, report) = read_dataset(data.as_bytes()).unwrap();

    assert_eq!(dataset.len(), 1);
    assert_eq!(report.total_rows, 2);
    assert_eq!(report.loaded_rows, 1);
    assert_eq!(
        report.rejected,
        vec![ParseError::InvalidTimestamp {
            line: 2,
            value: "not-a-date".to_string(),
        }]
    );
}

#[test]
fn rejects_bad_and_negative_prices() {
    let data = csv_with(&[
        "a1,sao paulo,Mid Value Customers,2017-10-02 10:56:33,abc,4,toys",
        "a2,sao paulo,Mid Value Customers,2017-10-02 10:56:33,-5.00,4,toys",
        "a3,sao paulo,Mid Value Customers,2017-10-02 10:56:33,,4,toys",
    ]);
    let (dataset, report) = read_dataset(data.as_bytes()).unwrap();

    assert!(dataset.is_empty());
    assert!(matches!(
        report.rejected[0],
        ParseError::InvalidNumber { line: 2, column: "total_price", .. }
    ));
    assert!(matches!(
        report.rejected[1],
        ParseError::NegativePrice { line: 3, .. }
    ));
    assert_eq!(
        report.rejected[2],
        ParseError::MissingField {
            line: 4,
            column: "total_price"
        }
    );
}

#[test]
fn rejects_prices_too_large_to_total() {
    let data = csv_with(&[
        "a1,sao paulo,Mid Value Customers,2017-10-02 10:56:33,70000000000000000000000000000,4,toys",
        "a2,sao paulo,Mid Value Customers,2017-10-03 10:56:33,70000000000000000000000000000,4,toys",
        "a3,sao paulo,Mid Value Customers,2017-10-04 10:56:33,1000000000000000,4,toys",
    ]);
    let (dataset, report) = read_dataset(data.as_bytes()).unwrap();

    assert_eq!(report.loaded_rows, 1);
    assert_eq!(dataset.records()[0].total_price, Decimal::from(1_000_000_000_000_000_u64));
    assert_eq!(report.rejected.len(), 2);
    assert!(matches!(
        report.rejected[0],
        ParseError::InvalidNumber { line: 2, column: "total_price", .. }
    ));
    assert!(matches!(
        report.rejected[1],
        ParseError::InvalidNumber { line: 3, column: "total_price", .. }
    ));
}

#[test]
fn rejects_non_numeric_review_score() {
    let data = csv_with(&["a1,sao paulo,Mid Value Customers,2017-10-02 10:56:33,38.71,great,toys"]);
    let (dataset, report) = read_dataset(data.as_bytes()).unwrap();
    assert!(dataset.is_empty());
    assert!(matches!(
        report.rejected[0],
        ParseError::InvalidNumber {
            column: "review_score",
            ..
        }
    ));
}

#[test]
fn missing_required_column_is_fatal() {
    let data = "customer_city,customer_segment,order_purchase_timestamp,total_price,review_score\n\
                sao paulo,Mid Value Customers,2017-10-02 10:56:33,38.71,4\n";
    let err = read_dataset(data.as_bytes()).unwrap_err();
    assert!(
        matches!(err, LoadError::MissingColumn(ref c) if c == "product_category_name_english"),
        "unexpected error: {err:?}"
    );
}

#[test]
fn empty_input_is_fatal() {
    let err = read_dataset("".as_bytes()).unwrap_err();
    assert!(matches!(err, LoadError::EmptyHeader));
}

#[test]
fn ragged_row_is_fatal() {
    let data = csv_with(&["a1,sao paulo,Mid Value Customers,2017-10-02 10:56:33"]);
    let err = read_dataset(data.as_bytes()).unwrap_err();
    assert!(matches!(err, LoadError::Csv(_)));
}

#[test]
fn header_only_gives_empty_dataset() {
    let (dataset, report) = read_dataset(csv_with(&[]).as_bytes()).unwrap();
    assert!(dataset.is_empty());
    assert_eq!(report, LoadReport::default());
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_dataset(&dir.path().join("nope.csv")).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
}

#[test]
fn load_dataset_reads_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "{}",
        csv_with(&["a1,sao paulo,,2017-01-05 09:00:00,100,5,toys"])
    )
    .unwrap();

    let (dataset, report) = load_dataset_with_report(file.path()).unwrap();
    assert_eq!(dataset.len(), 1);
    assert_eq!(report.segments_filled, 1);
}

#[test]
fn parse_timestamp_accepts_common_layouts() {
    let cases = [
        ("2017-10-02 10:56:33", "2017-10-02 10:56:33"),
        ("2017-10-02T10:56:33", "2017-10-02 10:56:33"),
        ("2017-10-02 10:56:33.250", "2017-10-02 10:56:33.250"),
        ("2017-10-02 10:56", "2017-10-02 10:56:00"),
        ("2017-10-02T10:56:33-03:00", "2017-10-02 10:56:33"),
        ("2017-10-02", "2017-10-02 00:00:00"),
        ("  2017-10-02 10:56:33 ", "2017-10-02 10:56:33"),
    ];
    for (raw, expected) in cases {
        let parsed = parse_timestamp(raw).unwrap_or_else(|| panic!("failed on {raw:?}"));
        assert_eq!(parsed.to_string(), expected, "input {raw:?}");
    }
}

#[test]
fn parse_timestamp_rejects_garbage() {
    for raw in ["", "yesterday", "2017-13-01", "02/10/2017"] {
        assert!(parse_timestamp(raw).is_none(), "{raw:?} should not parse");
    }
}
