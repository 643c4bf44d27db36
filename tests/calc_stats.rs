use attendanced::calc::{
    compute_stats, group_by_date_window, round_off_1_decimal, DailyTally, DEFAULT_CHART_WINDOW,
};
use attendanced::model::{AttendanceRecord, AttendanceStatus};

fn rec(student_id: &str, date: &str, status: AttendanceStatus) -> AttendanceRecord {
    AttendanceRecord {
        id: format!("{}-{}", student_id, date),
        student_id: student_id.to_string(),
        student_name: format!("Student {}", student_id),
        date: date.to_string(),
        status,
        marked_by: "t1".to_string(),
    }
}

#[test]
fn empty_input_yields_zeroes() {
    let stats = compute_stats(&Vec::<AttendanceRecord>::new());
    assert_eq!(stats.total, 0);
    assert_eq!(stats.present, 0);
    assert_eq!(stats.absent, 0);
    assert_eq!(stats.percentage, 0.0);
    assert!(!stats.percentage.is_nan());
}

#[test]
fn three_of_four_present_is_seventy_five() {
    let records = vec![
        rec("STU-1001", "2024-05-01", AttendanceStatus::Present),
        rec("STU-1002", "2024-05-01", AttendanceStatus::Present),
        rec("STU-1003", "2024-05-01", AttendanceStatus::Absent),
        rec("STU-1004", "2024-05-01", AttendanceStatus::Present),
    ];
    let stats = compute_stats(&records);
    assert_eq!(stats.total, 4);
    assert_eq!(stats.present, 3);
    assert_eq!(stats.absent, 1);
    assert_eq!(stats.percentage, 75.0);
}

#[test]
fn percentage_rounds_to_one_decimal() {
    // 2/3 = 66.666.. -> 66.7 ; 1/3 = 33.333.. -> 33.3 ; 1/6 = 16.666.. -> 16.7
    let mk = |present: usize, total: usize| -> Vec<AttendanceRecord> {
        (0..total)
            .map(|i| {
                let status = if i < present {
                    AttendanceStatus::Present
                } else {
                    AttendanceStatus::Absent
                };
                rec(&format!("STU-{}", 1000 + i), "2024-05-01", status)
            })
            .collect()
    };
    assert_eq!(compute_stats(&mk(2, 3)).percentage, 66.7);
    assert_eq!(compute_stats(&mk(1, 3)).percentage, 33.3);
    assert_eq!(compute_stats(&mk(1, 6)).percentage, 16.7);
    assert_eq!(compute_stats(&mk(5, 5)).percentage, 100.0);
    assert_eq!(compute_stats(&mk(0, 5)).percentage, 0.0);
    assert_eq!(round_off_1_decimal(12.25), 12.3);
}

#[test]
fn counts_always_partition_total() {
    let statuses = [
        AttendanceStatus::Present,
        AttendanceStatus::Absent,
        AttendanceStatus::Absent,
        AttendanceStatus::Present,
        AttendanceStatus::Present,
        AttendanceStatus::Absent,
        AttendanceStatus::Present,
    ];
    for n in 0..=statuses.len() {
        let records: Vec<AttendanceRecord> = statuses[..n]
            .iter()
            .enumerate()
            .map(|(i, s)| rec(&format!("STU-{}", i), "2024-05-02", *s))
            .collect();
        let stats = compute_stats(&records);
        assert_eq!(stats.total, n);
        assert_eq!(stats.present + stats.absent, stats.total);
    }
}

#[test]
fn window_keeps_most_recent_dates_ascending() {
    let mut records = Vec::new();
    for day in 1..=10 {
        let date = format!("2024-05-{:02}", day);
        records.push(rec("STU-1001", &date, AttendanceStatus::Present));
        records.push(rec("STU-1002", &date, AttendanceStatus::Absent));
    }
    // Input order must not matter.
    records.reverse();

    let chart = group_by_date_window(&records, DEFAULT_CHART_WINDOW);
    assert_eq!(chart.len(), 7);
    let dates: Vec<&str> = chart.iter().map(|t| t.date.as_str()).collect();
    assert_eq!(
        dates,
        vec![
            "2024-05-04",
            "2024-05-05",
            "2024-05-06",
            "2024-05-07",
            "2024-05-08",
            "2024-05-09",
            "2024-05-10"
        ]
    );
    for tally in &chart {
        assert_eq!(tally.present, 1);
        assert_eq!(tally.absent, 1);
    }
}

#[test]
fn window_larger_than_history_returns_everything() {
    let records = vec![
        rec("STU-1001", "2024-05-03", AttendanceStatus::Absent),
        rec("STU-1002", "2024-05-01", AttendanceStatus::Present),
        rec("STU-1001", "2024-05-01", AttendanceStatus::Present),
    ];
    let chart = group_by_date_window(&records, 7);
    assert_eq!(
        chart,
        vec![
            DailyTally {
                date: "2024-05-01".to_string(),
                present: 2,
                absent: 0,
            },
            DailyTally {
                date: "2024-05-03".to_string(),
                present: 0,
                absent: 1,
            },
        ]
    );
    assert!(group_by_date_window(&Vec::<AttendanceRecord>::new(), 7).is_empty());
}
