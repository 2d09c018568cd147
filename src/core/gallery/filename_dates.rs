// Filename-date parsing for the scanned photo walls.
//
// Two small parsers composed by a prioritized match: a compact `YYYYMMDD`
// digit run is tried first, then a dashed `YYYY-MM-DD` substring. Anything
// that does not form a valid calendar date falls through to "undated".

use chrono::NaiveDate;

/// Best-effort date extraction from a media filename.
pub fn date_from_filename(name: &str) -> Option<NaiveDate> {
    compact_date(name).or_else(|| dashed_date(name))
}

/// First run of 8+ digits, leading 8 parsed as `YYYYMMDD`.
fn compact_date(name: &str) -> Option<NaiveDate> {
    let bytes = name.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_digit() {
            let start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            if i - start >= 8 {
                let digits = &name[start..start + 8];
                if let Ok(date) = NaiveDate::parse_from_str(digits, "%Y%m%d") {
                    return Some(date);
                }
            }
        } else {
            i += 1;
        }
    }
    None
}

/// First `YYYY-MM-DD` shaped substring.
fn dashed_date(name: &str) -> Option<NaiveDate> {
    let bytes = name.as_bytes();
    if bytes.len() < 10 {
        return None;
    }
    for start in 0..=bytes.len() - 10 {
        let window = &bytes[start..start + 10];
        let shaped = window[4] == b'-'
            && window[7] == b'-'
            && window
                .iter()
                .enumerate()
                .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
        if shaped {
            if let Ok(date) = NaiveDate::parse_from_str(&name[start..start + 10], "%Y-%m-%d") {
                return Some(date);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn compact_format_in_camera_filenames() {
        assert_eq!(
            date_from_filename("IMG_20230415_123456.jpg"),
            Some(date(2023, 4, 15))
        );
        assert_eq!(date_from_filename("20191001.png"), Some(date(2019, 10, 1)));
    }

    #[test]
    fn dashed_format() {
        assert_eq!(
            date_from_filename("weibo 2021-07-09 sunset.webp"),
            Some(date(2021, 7, 9))
        );
    }

    #[test]
    fn compact_wins_when_both_present() {
        assert_eq!(
            date_from_filename("20230101 copy of 2021-07-09.jpg"),
            Some(date(2023, 1, 1))
        );
    }

    #[test]
    fn invalid_compact_falls_through_to_dashed() {
        // 20231345 is not a calendar date; the dashed parser still runs
        assert_eq!(
            date_from_filename("20231345_2022-02-02.jpg"),
            Some(date(2022, 2, 2))
        );
    }

    #[test]
    fn undated_names_return_none() {
        assert_eq!(date_from_filename("sunset.jpg"), None);
        assert_eq!(date_from_filename("IMG_1234.jpg"), None);
        assert_eq!(date_from_filename("99999999.jpg"), None);
    }

    #[test]
    fn non_ascii_names_are_handled() {
        assert_eq!(
            date_from_filename("北京 2020-05-01 天安门.jpg"),
            Some(date(2020, 5, 1))
        );
    }
}
