//! Text rendering of query results.

use std::fmt::Write;

use crate::aggregator::CategoryTotals;
use crate::query::{DashboardReport, DelayProportions, DestinationCount, MonthlyOccurrence};
use crate::selection::Selection;

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{:-<60}", "");
}

pub fn delay_hours_title(selection: &Selection) -> String {
    format!(
        "Total Hours of Delay Types for {} in {} on {}",
        selection.carrier,
        selection.month.name(),
        selection.day
    )
}

pub fn proportions_title(selection: &Selection) -> String {
    format!(
        "Percentage of Delay Types for {} in {} on {}",
        selection.carrier,
        selection.month.name(),
        selection.day
    )
}

pub fn monthly_title(carrier: &str) -> String {
    format!("Monthly Occurrences of Delayed Flights for {carrier}")
}

pub fn destinations_title(limit: usize, carrier: &str, month: &str) -> String {
    format!("Top {limit} Destinations for {carrier} in {month}")
}

pub fn render_delay_hours(title: &str, hours: &CategoryTotals) -> String {
    let mut out = String::new();
    heading(&mut out, title);
    let _ = writeln!(out, "{:<20} {:>14}", "Delay Type", "Total Hours");
    for (category, value) in hours.iter() {
        let _ = writeln!(out, "{:<20} {:>14.2}", category.column_name(), value);
    }
    out
}

pub fn render_proportions(title: &str, proportions: &DelayProportions) -> String {
    let mut out = String::new();
    heading(&mut out, title);
    match proportions {
        DelayProportions::NoData => {
            let _ = writeln!(out, "No delay minutes recorded for this selection.");
        }
        DelayProportions::Breakdown(shares) => {
            let _ = writeln!(out, "{:<20} {:>14} {:>10}", "Delay Type", "Minutes", "Share");
            for share in shares {
                let _ = writeln!(
                    out,
                    "{:<20} {:>14.1} {:>9.1}%",
                    share.category.column_name(),
                    share.minutes,
                    share.percent
                );
            }
        }
    }
    out
}

pub fn render_monthly(title: &str, months: &[MonthlyOccurrence]) -> String {
    let mut out = String::new();
    heading(&mut out, title);
    let _ = writeln!(out, "{:<12} {:>14}", "Month", "Occurrences");
    for month in months {
        let _ = writeln!(out, "{:<12} {:>14}", month.month_name, month.occurrences);
    }
    out
}

pub fn render_destinations(title: &str, destinations: &[DestinationCount]) -> String {
    let mut out = String::new();
    heading(&mut out, title);
    if destinations.is_empty() {
        let _ = writeln!(out, "No delayed flights for this selection.");
        return out;
    }

    let total: u64 = destinations.iter().map(|d| d.occurrences).sum();
    let _ = writeln!(out, "{:<12} {:>14} {:>10}", "Destination", "Occurrences", "Share");
    for dest in destinations {
        // Share of the listed destinations, as the pie chart labels show it
        let share = dest.occurrences as f64 * 100.0 / total as f64;
        let _ = writeln!(
            out,
            "{:<12} {:>14} {:>9.1}%",
            dest.destination, dest.occurrences, share
        );
    }
    out
}

pub fn render_report(selection: &Selection, report: &DashboardReport, limit: usize) -> String {
    let carrier = report.carrier.label();

    [
        render_delay_hours(&delay_hours_title(selection), &report.delay_hours),
        render_proportions(&proportions_title(selection), &report.delay_proportions),
        render_monthly(&monthly_title(carrier), &report.monthly_occurrences),
        render_destinations(
            &destinations_title(limit, carrier, report.month),
            &report.top_destinations,
        ),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::DelayCategory;
    use crate::query::CategoryShare;
    use crate::selection::CarrierFilter;

    #[test]
    fn test_titles() {
        let selection = Selection::from_parts(1, 5, CarrierFilter::code("AA")).unwrap();
        assert_eq!(
            delay_hours_title(&selection),
            "Total Hours of Delay Types for AA in January on 5"
        );
        assert_eq!(
            proportions_title(&Selection::default()),
            "Percentage of Delay Types for All Carriers in January on 1"
        );
        assert_eq!(
            destinations_title(10, "All Carriers", "March"),
            "Top 10 Destinations for All Carriers in March"
        );
    }

    #[test]
    fn test_render_delay_hours_in_category_order() {
        let hours = CategoryTotals::from_values([0.0, 3.0, 0.0, 0.0, 1.5]);
        let text = render_delay_hours("t", &hours);
        let weather = text.find("WeatherDelay").unwrap();
        let late = text.find("LateAircraftDelay").unwrap();
        assert!(weather < late);
        assert!(text.contains("3.00"));
    }

    #[test]
    fn test_render_proportions() {
        assert!(render_proportions("t", &DelayProportions::NoData).contains("No delay minutes"));

        let text = render_proportions(
            "t",
            &DelayProportions::Breakdown(vec![CategoryShare {
                category: DelayCategory::NasDelay,
                minutes: 90.0,
                percent: 100.0,
            }]),
        );
        assert!(text.contains("NASDelay"));
        assert!(text.contains("100.0%"));
    }

    #[test]
    fn test_render_destinations() {
        assert!(render_destinations("t", &[]).contains("No delayed flights"));

        let text = render_destinations(
            "t",
            &[
                DestinationCount {
                    destination: "ORD".to_string(),
                    occurrences: 3,
                },
                DestinationCount {
                    destination: "LAX".to_string(),
                    occurrences: 1,
                },
            ],
        );
        assert!(text.contains("75.0%"));
        assert!(text.contains("25.0%"));
    }

    #[test]
    fn test_render_monthly() {
        let months = vec![MonthlyOccurrence {
            month: 1,
            month_name: "January",
            occurrences: 42,
        }];
        let text = render_monthly(&monthly_title("WN"), &months);
        assert!(text.starts_with("Monthly Occurrences of Delayed Flights for WN"));
        assert!(text.contains("42"));
    }
}
