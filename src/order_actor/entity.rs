//! Entity trait implementation for the Order domain type.
//!
//! The hooks here enforce the rules that depend only on the order itself: line
//! quantities, the transition policy, catch-weight settlement and invoicing. Rules that
//! need other resources (cutoff, catalog, customer) are checked by
//! [`OrderClient`](crate::clients::OrderClient) before the order is created.

use super::actions::{OrderAction, OrderActionResult};
use super::{OrderContext, OrderError, TransitionPolicy};
use crate::framework::ActorEntity;
use crate::model::{InvoiceSummary, LineCreate, Order, OrderCreate, OrderId, OrderStatus, OrderUpdate};
use async_trait::async_trait;
use chrono::Datelike;
use rust_decimal::Decimal;
use tracing::info;

fn check_line(line: &LineCreate) -> Result<(), OrderError> {
    if line.sku.is_empty() {
        return Err(OrderError::Validation("line sku is required".into()));
    }
    if line.requested_qty <= Decimal::ZERO {
        return Err(OrderError::Validation(format!(
            "quantity for {} must be positive",
            line.sku
        )));
    }
    if line.unit_price.is_some_and(|price| price.is_sign_negative()) {
        return Err(OrderError::Validation(format!("negative price for {}", line.sku)));
    }
    Ok(())
}

impl Order {
    fn ensure_not_invoiced(&self) -> Result<(), OrderError> {
        match self.invoice_number {
            Some(number) => Err(OrderError::AlreadyInvoiced(number)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type Create = OrderCreate;
    type Update = OrderUpdate;
    type Action = OrderAction;
    type ActionResult = OrderActionResult;
    type Context = OrderContext;
    type Error = OrderError;

    fn from_create_params(id: OrderId, params: OrderCreate) -> Result<Self, Self::Error> {
        if params.lines.is_empty() {
            return Err(OrderError::Validation("an order needs at least one line".into()));
        }
        params.lines.iter().try_for_each(check_line)?;
        Ok(Self::new(id, params))
    }

    /// Staff edits. `Invoiced` is only reachable through [`OrderAction::Invoice`].
    async fn on_update(&mut self, update: OrderUpdate, ctx: &OrderContext) -> Result<(), Self::Error> {
        if let Some(to) = update.status.filter(|to| *to != self.status) {
            let from = self.status;
            let allowed = to != OrderStatus::Invoiced
                && match ctx.transitions {
                    TransitionPolicy::Permissive => true,
                    TransitionPolicy::Strict => from.can_transition_to(to),
                };
            if !allowed {
                return Err(OrderError::IllegalTransition { from, to });
            }
            self.status = to;
        }
        if let Some(notes) = update.notes_internal {
            self.notes_internal = notes;
        }
        if let Some(payment_method) = update.payment_method {
            self.payment_method = payment_method;
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: OrderAction,
        ctx: &OrderContext,
    ) -> Result<OrderActionResult, Self::Error> {
        match action {
            OrderAction::RecordPackedWeight { line, weight } => {
                self.ensure_not_invoiced()?;
                if weight <= Decimal::ZERO {
                    return Err(OrderError::Validation(format!(
                        "packed weight must be positive, got {weight}"
                    )));
                }
                let target = self.line_mut(line).ok_or(OrderError::LineNotFound(line))?;
                if !target.catch_weight {
                    return Err(OrderError::NotCatchWeight(line));
                }
                target.packed_weight = Some(weight);
                Ok(OrderActionResult::RecordPackedWeight(target.clone()))
            }
            OrderAction::AddLine(params) => {
                self.ensure_not_invoiced()?;
                check_line(&params)?;
                Ok(OrderActionResult::AddLine(self.push_line(params)))
            }
            OrderAction::Invoice { at } => {
                self.ensure_not_invoiced()?;
                if ctx.transitions == TransitionPolicy::Strict
                    && !self.status.can_transition_to(OrderStatus::Invoiced)
                {
                    return Err(OrderError::IllegalTransition {
                        from: self.status,
                        to: OrderStatus::Invoiced,
                    });
                }
                let number = ctx
                    .invoices
                    .next(at.year())
                    .map_err(|e| OrderError::InvoiceNumbersExhausted(e.0))?;
                // Nothing below can fail, so a drawn number is always used.
                self.invoice_number = Some(number);
                self.invoiced_at = Some(at);
                self.status = OrderStatus::Invoiced;
                let summary = InvoiceSummary::for_order(self, number, at, ctx.vat_rate);
                info!(order_id = %self.id, %number, total = %summary.total, "Invoice issued");
                Ok(OrderActionResult::Invoice(summary))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        CustomerId, DeliveryType, InvoiceNumber, LineId, OrderChannel, PaymentMethod, RingId, Sku,
        StopId, Unit,
    };
    use crate::order_actor::InvoiceSequence;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn ctx(transitions: TransitionPolicy) -> OrderContext {
        OrderContext {
            invoices: Arc::new(InvoiceSequence::new()),
            transitions,
            vat_rate: dec!(0.20),
        }
    }

    fn line(sku: &str, unit: Unit, qty: Decimal, price: Option<Decimal>) -> LineCreate {
        LineCreate {
            sku: Sku::new(sku),
            product_name: sku.into(),
            unit,
            catch_weight: unit.is_weight(),
            requested_qty: qty,
            unit_price: price,
            substitution_allowed: true,
        }
    }

    fn params(lines: Vec<LineCreate>) -> OrderCreate {
        OrderCreate {
            created_at: Utc.with_ymd_and_hms(2025, 10, 6, 20, 0, 0).unwrap(),
            channel: OrderChannel::Web,
            customer_id: CustomerId(1),
            contact_phone: "+37255512345".into(),
            ring_id: RingId(1),
            stop_id: StopId(1),
            delivery_type: DeliveryType::Stop,
            delivery_address: None,
            payment_method: PaymentMethod::Cash,
            notes_customer: String::new(),
            lines,
        }
    }

    fn order() -> Order {
        Order::from_create_params(
            OrderId(1),
            params(vec![
                line("PORK-010", Unit::Kg, dec!(2), Some(dec!(8.50))),
                line("PORK-004", Unit::Piece, dec!(1), Some(dec!(4.20))),
            ]),
        )
        .unwrap()
    }

    #[test]
    fn empty_or_zero_quantity_orders_are_rejected() {
        assert!(Order::from_create_params(OrderId(1), params(vec![])).is_err());
        let zero = params(vec![line("PORK-004", Unit::Piece, dec!(0), None)]);
        assert!(matches!(
            Order::from_create_params(OrderId(1), zero),
            Err(OrderError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn packed_weight_only_for_catch_weight_lines() {
        let ctx = ctx(TransitionPolicy::Permissive);
        let mut order = order();

        let piece = order
            .handle_action(OrderAction::RecordPackedWeight { line: LineId(2), weight: dec!(1.1) }, &ctx)
            .await;
        assert_eq!(piece, Err(OrderError::NotCatchWeight(LineId(2))));

        let missing = order
            .handle_action(OrderAction::RecordPackedWeight { line: LineId(9), weight: dec!(1) }, &ctx)
            .await;
        assert_eq!(missing, Err(OrderError::LineNotFound(LineId(9))));

        let zero = order
            .handle_action(OrderAction::RecordPackedWeight { line: LineId(1), weight: dec!(0) }, &ctx)
            .await;
        assert!(matches!(zero, Err(OrderError::Validation(_))));

        order
            .handle_action(OrderAction::RecordPackedWeight { line: LineId(1), weight: dec!(1.8) }, &ctx)
            .await
            .unwrap();
        assert_eq!(order.total(), dec!(19.50));
    }

    #[tokio::test]
    async fn strict_policy_rejects_skipping_states() {
        let ctx = ctx(TransitionPolicy::Strict);
        let mut order = order();
        let skip = OrderUpdate {
            status: Some(OrderStatus::Done),
            ..Default::default()
        };
        assert_eq!(
            order.on_update(skip, &ctx).await,
            Err(OrderError::IllegalTransition {
                from: OrderStatus::New,
                to: OrderStatus::Done
            })
        );
        let accept = OrderUpdate {
            status: Some(OrderStatus::Accepted),
            ..Default::default()
        };
        order.on_update(accept, &ctx).await.unwrap();
        assert_eq!(order.status, OrderStatus::Accepted);
    }

    #[tokio::test]
    async fn invoiced_cannot_be_set_by_hand() {
        let ctx = ctx(TransitionPolicy::Permissive);
        let mut order = order();
        let update = OrderUpdate {
            status: Some(OrderStatus::Invoiced),
            ..Default::default()
        };
        assert!(matches!(
            order.on_update(update, &ctx).await,
            Err(OrderError::IllegalTransition { .. })
        ));
    }

    #[tokio::test]
    async fn invoicing_numbers_and_settles_once() {
        let ctx = ctx(TransitionPolicy::Permissive);
        let mut order = order();
        let at = Utc.with_ymd_and_hms(2025, 10, 9, 9, 0, 0).unwrap();

        let OrderActionResult::Invoice(summary) = order
            .handle_action(OrderAction::Invoice { at }, &ctx)
            .await
            .unwrap()
        else {
            panic!("expected invoice summary");
        };
        assert_eq!(summary.number.to_string(), "2025-0001");
        assert_eq!(summary.subtotal, dec!(21.20));
        assert_eq!(summary.vat, dec!(4.24));
        assert_eq!(summary.total, dec!(25.44));
        assert_eq!(order.status, OrderStatus::Invoiced);
        assert_eq!(order.invoiced_at, Some(at));

        let again = order.handle_action(OrderAction::Invoice { at }, &ctx).await;
        assert_eq!(again, Err(OrderError::AlreadyInvoiced(summary.number)));
        assert_eq!(ctx.invoices.last(2025), Some(summary.number));
    }

    #[tokio::test]
    async fn exhausted_year_leaves_order_uninvoiced() {
        let ctx = OrderContext {
            invoices: Arc::new(InvoiceSequence::seeded(["2025-9999".parse::<InvoiceNumber>().unwrap()])),
            ..ctx(TransitionPolicy::Permissive)
        };
        let mut order = order();
        let at = Utc.with_ymd_and_hms(2025, 12, 30, 9, 0, 0).unwrap();
        let result = order.handle_action(OrderAction::Invoice { at }, &ctx).await;
        assert_eq!(result, Err(OrderError::InvoiceNumbersExhausted(2025)));
        assert_eq!(order.invoice_number, None);
        assert_eq!(order.status, OrderStatus::New);
    }

    #[tokio::test]
    async fn strict_invoicing_requires_done() {
        let ctx = ctx(TransitionPolicy::Strict);
        let mut order = order();
        let at = Utc.with_ymd_and_hms(2025, 10, 9, 9, 0, 0).unwrap();
        let early = order.handle_action(OrderAction::Invoice { at }, &ctx).await;
        assert!(matches!(early, Err(OrderError::IllegalTransition { .. })));
        assert_eq!(ctx.invoices.last(2025), None);

        order.status = OrderStatus::Done;
        assert!(order.handle_action(OrderAction::Invoice { at }, &ctx).await.is_ok());
    }
}
