//! Quick action catalog

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickAction {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

pub const QUICK_ACTIONS: [QuickAction; 6] = [
    QuickAction {
        id: "summarize",
        title: "Summarize Documents",
        description: "Get a quick overview of all uploaded files",
    },
    QuickAction {
        id: "extract",
        title: "Extract Key Data",
        description: "Pull out important numbers and dates",
    },
    QuickAction {
        id: "categorize",
        title: "Categorize Expenses",
        description: "Automatically sort transactions by type",
    },
    QuickAction {
        id: "calculate",
        title: "Calculate Totals",
        description: "Sum up amounts and generate subtotals",
    },
    QuickAction {
        id: "trends",
        title: "Analyze Trends",
        description: "Identify spending patterns over time",
    },
    QuickAction {
        id: "report",
        title: "Generate Report",
        description: "Create a formatted financial report",
    },
];

pub fn find(id: &str) -> Option<&'static QuickAction> {
    QUICK_ACTIONS.iter().find(|a| a.id.eq_ignore_ascii_case(id))
}

pub fn print_actions() {
    println!("Quick Actions");
    println!("{}", "-".repeat(60));
    for action in &QUICK_ACTIONS {
        println!("{:<12} {}", action.id, action.title);
        println!("{:<12} {}", "", action.description);
    }
}

pub fn print_action(action: &QuickAction) {
    println!("{} ({})", action.title, action.id);
    println!("  {}", action.description);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_action() {
        assert_eq!(find("trends").map(|a| a.title), Some("Analyze Trends"));
        assert_eq!(find("REPORT").map(|a| a.id), Some("report"));
        assert!(find("forecast").is_none());
    }

    #[test]
    fn test_ids_are_unique() {
        let mut ids: Vec<_> = QUICK_ACTIONS.iter().map(|a| a.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), QUICK_ACTIONS.len());
    }
}
