/// `round(100 * part / whole)`, rounding halves up. Zero when `whole` is zero.
pub fn round_percent(part: usize, whole: usize) -> u32 {
    match whole {
        positive if positive > 0 => ((part as f64 / whole as f64) * 100.0).round() as u32,
        _ => 0,
    }
}

/// Encouragement shown on the results screen.
pub fn grade_message(percent: u32) -> &'static str {
    match percent {
        90.. => "Excellent !",
        75..=89 => "Très bien !",
        60..=74 => "Bien joué !",
        40..=59 => "Pas mal !",
        _ => "Continuez à vous entraîner !",
    }
}

/// Number of filled stars out of five.
pub fn star_count(percent: u32) -> usize {
    ((percent.min(100) as f64 / 100.0) * 5.0).ceil() as usize
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Good,
    Fair,
    Poor,
}

pub fn score_band(percent: u32) -> ScoreBand {
    if percent >= 75 {
        ScoreBand::Good
    } else if percent >= 50 {
        ScoreBand::Fair
    } else {
        ScoreBand::Poor
    }
}
