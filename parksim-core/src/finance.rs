//! Cash, loan and the weekly expenditure ledger.

use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ExpenditureType {
    RideConstruction,
    RideRunningCosts,
    LandPurchase,
    Landscaping,
    ParkEntranceTickets,
    ParkRideTickets,
    ShopSales,
    ShopStock,
    FoodDrinkSales,
    FoodDrinkStock,
    Wages,
    Marketing,
    Research,
    Interest,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Finance {
    pub cash: Money,
    pub bank_loan: Money,
    /// This week's signed totals per category (income positive).
    pub expenditure: BTreeMap<ExpenditureType, Money>,
    /// Net income booked since the last day start.
    pub current_expenditure: Money,
    /// Yesterday's net income at a weekly rate.
    pub current_profit: Money,
    pub weekly_profit_average_dividend: Money,
    pub weekly_profit_average_divisor: u16,
}

impl Finance {
    pub fn new(cash: Money, bank_loan: Money) -> Self {
        Self {
            cash,
            bank_loan,
            ..Default::default()
        }
    }

    /// Pays `cost` out of cash (negative cost is income) and books it.
    pub fn payment(&mut self, cost: Money, kind: ExpenditureType) {
        self.cash = self.cash.saturating_sub(cost);
        let entry = self.expenditure.entry(kind).or_insert(Money::ZERO);
        *entry = entry.saturating_sub(cost);
        self.current_expenditure = self.current_expenditure.saturating_sub(cost);
    }

    /// Signed sum of this week's ledger.
    pub fn weekly_total(&self) -> Money {
        self.expenditure
            .values()
            .fold(Money::ZERO, |acc, &m| acc.saturating_add(m))
    }

    /// Closes the day: its net income, scaled to a week, feeds the weekly
    /// average and the daily counter starts again from zero.
    pub fn update_daily_profit(&mut self) {
        self.current_profit = Money(self.current_expenditure.0.saturating_mul(7));
        self.current_expenditure = Money::ZERO;
        self.weekly_profit_average_dividend = self
            .weekly_profit_average_dividend
            .saturating_add(self.current_profit);
        self.weekly_profit_average_divisor = self.weekly_profit_average_divisor.saturating_add(1);
    }

    /// Average profit since the last weekly reset, and resets the average.
    pub fn take_weekly_profit_average(&mut self) -> Money {
        let mut average = self.weekly_profit_average_dividend;
        if self.weekly_profit_average_divisor != 0 {
            average = average / self.weekly_profit_average_divisor as i64;
        }
        self.weekly_profit_average_dividend = Money::ZERO;
        self.weekly_profit_average_divisor = 0;
        average
    }

    /// Starts a new ledger week.
    pub fn close_week(&mut self) {
        self.expenditure.clear();
    }
}
