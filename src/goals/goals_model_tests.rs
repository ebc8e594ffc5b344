//! Tests for goal domain models and typed accessors.

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use crate::goals::goals_schedule::ContributionFrequency;
    use crate::goals::{SavingsGoal, SavingsGoalDto};

    fn goal(target: &str, current: &str) -> SavingsGoal {
        SavingsGoal {
            id: "goal-1".to_string(),
            name: "Emergency fund".to_string(),
            target_amount: target.to_string(),
            current_amount: current.to_string(),
            deadline: Some("2025-12-31".to_string()),
            contribution_frequency: Some("MONTHLY".to_string()),
            contribution_day: Some(15),
            icon: None,
            color: None,
            notes: None,
            created_at: "2025-01-01T00:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn test_frequency_serialization() {
        assert_eq!(
            serde_json::to_string(&ContributionFrequency::Monthly).unwrap(),
            "\"MONTHLY\""
        );
        assert_eq!(
            serde_json::to_string(&ContributionFrequency::None).unwrap(),
            "\"NONE\""
        );
        assert_eq!(
            serde_json::from_str::<ContributionFrequency>("\"WEEKLY\"").unwrap(),
            ContributionFrequency::Weekly
        );
    }

    #[test]
    fn test_frequency_parse_falls_back_to_none() {
        assert_eq!(
            ContributionFrequency::parse(Some("DAILY")),
            ContributionFrequency::Daily
        );
        assert_eq!(
            ContributionFrequency::parse(Some("yearly")),
            ContributionFrequency::None
        );
        assert_eq!(ContributionFrequency::parse(None), ContributionFrequency::None);
    }

    #[test]
    fn test_percent_complete_is_clamped_to_100() {
        assert_eq!(goal("1000", "250").percent_complete(), dec!(25.0));
        assert_eq!(goal("1000", "1500").percent_complete(), dec!(100));
        assert_eq!(goal("0", "500").percent_complete(), dec!(0));
    }

    #[test]
    fn test_negative_stored_balance_is_clamped() {
        let g = goal("1000", "-40");
        assert_eq!(g.current_amount_decimal(), dec!(0));
    }

    #[test]
    fn test_unparsable_amounts_read_as_zero() {
        let g = goal("not a number", "also bad");
        assert_eq!(g.target_amount_decimal(), dec!(0));
        assert_eq!(g.current_amount_decimal(), dec!(0));
    }

    #[test]
    fn test_created_date_accepts_rfc3339_and_plain_dates() {
        let mut g = goal("1000", "0");
        assert_eq!(
            g.created_date(),
            chrono::NaiveDate::from_ymd_opt(2025, 1, 1)
        );

        g.created_at = "2025-03-15".to_string();
        assert_eq!(
            g.created_date(),
            chrono::NaiveDate::from_ymd_opt(2025, 3, 15)
        );

        g.created_at = "yesterday".to_string();
        assert_eq!(g.created_date(), None);
    }

    #[test]
    fn test_dto_exposes_numeric_fields() {
        let dto = SavingsGoalDto::from(goal("1000", "250"));
        assert_eq!(dto.target_amount, 1000.0);
        assert_eq!(dto.current_amount, 250.0);
        assert_eq!(dto.percent_complete, 25.0);
        assert_eq!(dto.contribution_frequency, ContributionFrequency::Monthly);
    }
}
