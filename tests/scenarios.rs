use incident_timeline::loader::load_raw_rows_from_reader;
use incident_timeline::{normalize, query, Dataset, QueryError, RawRow, Selection, YearCount};

fn raw(year: i32, month: i32, day: i32, region: &str, city: &str) -> RawRow {
    RawRow {
        year: Some(year.to_string()),
        month: Some(month.to_string()),
        day: Some(day.to_string()),
        region: Some(region.into()),
        city: Some(city.into()),
        ..RawRow::default()
    }
}

fn scenario_dataset() -> Dataset {
    normalize(vec![
        raw(2015, 3, 0, "X", "A"),
        raw(2015, 3, 10, "X", "A"),
        raw(2016, 5, 1, "Y", "B"),
    ])
    .0
}

#[test]
fn scenario_a_counts_matching_year() {
    let ds = scenario_dataset();
    let res = query(&ds, &Selection::new(["X"], ["A"], 2010, 2016)).unwrap();
    assert_eq!(res.yearly, vec![YearCount { year: 2015, count: 2 }]);
}

#[test]
fn scenario_b_range_before_data_is_empty() {
    let ds = scenario_dataset();
    let res = query(&ds, &Selection::new(["X"], ["A"], 2010, 2014)).unwrap();
    assert!(res.yearly.is_empty());
    assert!(res.matches.is_empty());
}

#[test]
fn scenario_c_unknown_month_rows_never_reach_options() {
    let (ds, report) = normalize(vec![
        raw(2016, 0, 5, "Phantom", "Ghost Town"),
        raw(2015, 3, 10, "X", "A"),
    ]);
    assert_eq!(report.unknown_month_rows, 1);
    assert_eq!(ds.len(), 1);
    assert!(!ds.region_options().contains(&"Phantom".to_string()));
    assert!(!ds.city_options().contains(&"Ghost Town".to_string()));
}

#[test]
fn scenario_d_inverted_range_fails() {
    let ds = scenario_dataset();
    let err = query(&ds, &Selection::new(["X"], ["A"], 2020, 2010)).unwrap_err();
    assert!(matches!(err, QueryError::InvalidRange { year_min: 2020, year_max: 2010 }));
}

fn mixed_rows() -> Vec<RawRow> {
    let regions = ["Baghdad", "Sindh", "Nineveh"];
    let cities = ["Baghdad", "Karachi", "Mosul", "Unknown"];
    (0..240)
        .map(|n: i32| {
            raw(
                1995 + n % 22,
                n % 13,
                n % 32,
                regions[(n % 3) as usize],
                cities[(n % 4) as usize],
            )
        })
        .collect()
}

#[test]
fn p1_and_p2_month_exclusion_and_day_imputation() {
    let rows = mixed_rows();
    let zero_month = rows.iter().filter(|r| r.month.as_deref() == Some("0")).count();
    let (ds, report) = normalize(rows);

    assert_eq!(report.unknown_month_rows, zero_month);
    assert!(ds.incidents().iter().all(|i| (1..=12).contains(&i.month)));
    for i in ds.incidents().iter().filter(|i| i.day_imputed) {
        assert_eq!(i.day, 15);
        assert_eq!(i.event_date.format("%Y-%m").to_string(), format!("{}-{:02}", i.year, i.month));
    }
    assert_eq!(
        report.kept_rows + report.unknown_month_rows + report.rejected_dates + report.unparseable_rows,
        report.total_rows
    );
}

#[test]
fn p3_to_p5_determinism_sparsity_ordering() {
    let (ds, _) = normalize(mixed_rows());
    let selection = Selection::new(ds.region_options().to_vec(), ds.city_options().to_vec(), 1990, 2020);

    let first = query(&ds, &selection).unwrap();
    let second = query(&ds, &selection).unwrap();
    assert_eq!(first, second);

    assert!(!first.yearly.is_empty());
    assert!(first.yearly.iter().all(|yc| yc.count > 0));
    assert!(first.yearly.windows(2).all(|w| w[0].year < w[1].year));
    let total: usize = first.yearly.iter().map(|yc| yc.count).sum();
    assert_eq!(total, first.matches.len());
    assert_eq!(total, ds.len());
}

#[test]
fn p6_empty_selection_sets_match_nothing() {
    let (ds, _) = normalize(mixed_rows());
    let none: Vec<String> = Vec::new();

    let res = query(&ds, &Selection::new(none.clone(), ds.city_options().to_vec(), 1990, 2020)).unwrap();
    assert!(res.yearly.is_empty());
    let res = query(&ds, &Selection::new(ds.region_options().to_vec(), none, 1990, 2020)).unwrap();
    assert!(res.yearly.is_empty());
    assert!(query(&ds, &Selection::initial(&ds)).unwrap().yearly.is_empty());
}

#[test]
fn concurrent_queries_share_one_dataset() {
    let (ds, _) = normalize(mixed_rows());
    let selection = Selection::new(["Sindh"], ["Karachi", "Mosul"], 1995, 2016);
    let expected = query(&ds, &selection).unwrap().yearly;

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| query(&ds, &selection).unwrap().yearly))
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), expected);
        }
    });
}

#[test]
fn end_to_end_from_latin1_csv() {
    let mut bytes = b"iyear,imonth,iday,provstate,city,longitude,latitude,nkill,nwound,summary,target1,gname\n".to_vec();
    bytes.extend_from_slice(b"2014,1,0,S\xe3o Paulo,S\xe3o Paulo,-46.6,-23.5,1,2,Shooting,Police,Unknown\n");
    bytes.extend_from_slice(b"2015,2,30,S\xe3o Paulo,S\xe3o Paulo,,,,,,,\n");
    bytes.extend_from_slice(b"2015,0,3,S\xe3o Paulo,S\xe3o Paulo,,,,,,,\n");
    bytes.extend_from_slice(b"2016,6,6,S\xe3o Paulo,S\xe3o Paulo,,,,,,,\n");

    let load = load_raw_rows_from_reader(bytes.as_slice()).unwrap();
    let (ds, report) = normalize(load.rows);
    assert_eq!(report.rejected_dates, 1);
    assert_eq!(report.unknown_month_rows, 1);
    assert_eq!(ds.region_options(), ["São Paulo".to_string()]);
    assert_eq!(ds.year_bounds(), Some((2014, 2016)));

    let res = query(&ds, &Selection::new(["São Paulo"], ["São Paulo"], 2014, 2016)).unwrap();
    assert_eq!(
        res.yearly,
        vec![YearCount { year: 2014, count: 1 }, YearCount { year: 2016, count: 1 }]
    );
    assert_eq!(res.matches[0].killed, Some(1.0));
}
