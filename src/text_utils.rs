use chrono::NaiveDate;

/// Words per minute assumed when estimating read time.
const READING_SPEED: usize = 200;

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Estimated minutes to read a post body. Never less than one minute.
pub fn read_time(body: &str) -> u32 {
    word_count(body).div_ceil(READING_SPEED).max(1) as u32
}

pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_count() {
        assert_eq!(word_count("one two  three\nfour"), 4);
        assert_eq!(word_count(""), 0);
    }

    #[test]
    fn test_read_time_short_body_is_one_minute() {
        assert_eq!(read_time("a few words only"), 1);
        assert_eq!(read_time(""), 1);
    }

    #[test]
    fn test_read_time_rounds_up() {
        let body = "word ".repeat(201);
        assert_eq!(read_time(&body), 2);
        let body = "word ".repeat(400);
        assert_eq!(read_time(&body), 2);
        let body = "word ".repeat(401);
        assert_eq!(read_time(&body), 3);
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(format_date(&date), "2024-03-07");
    }
}
