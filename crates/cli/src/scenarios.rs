//! Checkout scenarios run by the demo.

use common::Money;
use saga::{
    InMemoryInventoryService, InMemoryPaymentService, InMemoryShippingService, OrderCoordinator,
    OrderFacade, OrderOutcome, PaymentService,
};
use serde::Serialize;

use crate::config::Config;

/// Stock the demo inventory starts with.
pub const DEMO_CATALOG: &[(&str, u32)] = &[
    ("Laptop", 5),
    ("Gaming PC", 2),
    ("Mouse", 10),
    ("Vintage Console", 0),
];

/// One order to place.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: &'static str,
    pub items: Vec<(&'static str, Money)>,
    pub card_token: &'static str,
    pub address: &'static str,
}

/// What happened when a scenario ran.
#[derive(Debug, Serialize)]
pub struct ScenarioReport {
    pub scenario: &'static str,
    pub outcome: OrderOutcome,
    /// Payment refunded by the demo after a failure that captured it.
    pub refunded_payment: Option<String>,
}

/// The scenarios the demo runs, in order.
pub fn default_scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "laptop_within_limit",
            items: vec![("Laptop", Money::from_dollars(800))],
            card_token: "1234-5678",
            address: "NY-Street",
        },
        Scenario {
            name: "gaming_pc_over_limit",
            items: vec![("Gaming PC", Money::from_dollars(2000))],
            card_token: "1234-5678",
            address: "LA-Avenue",
        },
        Scenario {
            name: "empty_cart",
            items: vec![],
            card_token: "1234-5678",
            address: "NY-Street",
        },
        Scenario {
            name: "missing_address",
            items: vec![("Laptop", Money::from_dollars(800))],
            card_token: "1234-5678",
            address: "",
        },
        Scenario {
            name: "out_of_stock",
            items: vec![
                ("Mouse", Money::from_dollars(25)),
                ("Vintage Console", Money::from_dollars(300)),
            ],
            card_token: "1234-5678",
            address: "SF-Market",
        },
    ]
}

/// In-memory collaborators shared by every scenario of a demo run.
pub struct Demo {
    inventory: InMemoryInventoryService,
    payment: InMemoryPaymentService,
    shipping: InMemoryShippingService,
}

impl Demo {
    /// Creates the demo collaborators from configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            inventory: InMemoryInventoryService::with_stock(DEMO_CATALOG.iter().copied()),
            payment: InMemoryPaymentService::with_limit(config.payment_limit),
            shipping: InMemoryShippingService::with_min_address_len(config.min_address_len),
        }
    }

    pub fn inventory(&self) -> &InMemoryInventoryService {
        &self.inventory
    }

    pub fn payment(&self) -> &InMemoryPaymentService {
        &self.payment
    }

    /// Runs one scenario in a fresh shopping session.
    ///
    /// A failure that captured payment is refunded right away, which is the
    /// caller's job since the coordinator never refunds.
    #[tracing::instrument(skip(self, scenario), fields(scenario = scenario.name))]
    pub fn run(&self, scenario: &Scenario) -> ScenarioReport {
        let mut facade = OrderFacade::new(OrderCoordinator::new(
            self.inventory.clone(),
            self.payment.clone(),
            self.shipping.clone(),
        ));

        for (name, price) in &scenario.items {
            if let Err(e) = facade.add_to_cart(*name, *price) {
                tracing::warn!(item = *name, error = %e, "item rejected by cart");
            }
        }

        let outcome = facade.place_order(scenario.card_token, scenario.address);

        let refunded_payment = outcome
            .failure()
            .filter(|f| f.requires_refund())
            .and_then(|f| f.payment_id.clone())
            .and_then(|payment_id| match self.payment.refund(&payment_id) {
                Ok(()) => {
                    tracing::info!(%payment_id, "captured payment refunded");
                    Some(payment_id)
                }
                Err(e) => {
                    tracing::error!(%payment_id, error = %e, "refund failed");
                    None
                }
            });

        ScenarioReport {
            scenario: scenario.name,
            outcome,
            refunded_payment,
        }
    }

    /// Runs every scenario in order.
    pub fn run_all(&self, scenarios: &[Scenario]) -> Vec<ScenarioReport> {
        scenarios.iter().map(|s| self.run(s)).collect()
    }
}
