//! The transition functions.
//!
//! Each function takes a snapshot and returns a new one; the input is never
//! modified and nothing is read from a clock or a store. Persisting the
//! result, and retrying when the persisted snapshot moved underneath the
//! caller, is the caller's job.

use chrono::{DateTime, Utc};

use super::{Actor, LifecycleError, Transition, TransitionKind};
use crate::domain::{Order, OrderState, RiderId, Role};

/// Assigns `rider` to a pending order.
pub fn assign(
    order: &Order,
    rider: RiderId,
    actor: &Actor,
    at: DateTime<Utc>,
) -> Result<Order, LifecycleError> {
    ensure_edge(order, TransitionKind::Assign)?;
    check_rider(order, &rider)?;
    ensure_role(actor, TransitionKind::Assign)?;
    ensure_party(order, actor, TransitionKind::Assign)?;
    Ok(order.advance(OrderState::Assigned { rider }, at))
}

/// Marks an assigned order as picked up by its rider.
pub fn pick(order: &Order, actor: &Actor, at: DateTime<Utc>) -> Result<Order, LifecycleError> {
    ensure_edge(order, TransitionKind::Pick)?;
    let rider = ensure_assigned_rider(order, actor, TransitionKind::Pick)?;
    Ok(order.advance(OrderState::Picked { rider }, at))
}

/// Marks a picked order as delivered by its rider.
pub fn deliver(order: &Order, actor: &Actor, at: DateTime<Utc>) -> Result<Order, LifecycleError> {
    ensure_edge(order, TransitionKind::Deliver)?;
    let rider = ensure_assigned_rider(order, actor, TransitionKind::Deliver)?;
    Ok(order.advance(OrderState::Delivered { rider }, at))
}

/// Cancels a non-terminal order, releasing its rider.
pub fn cancel(order: &Order, actor: &Actor, at: DateTime<Utc>) -> Result<Order, LifecycleError> {
    ensure_edge(order, TransitionKind::Cancel)?;
    ensure_role(actor, TransitionKind::Cancel)?;
    ensure_party(order, actor, TransitionKind::Cancel)?;
    Ok(order.advance(OrderState::Cancelled, at))
}

/// Applies any [`Transition`] to `order`.
pub fn apply(
    order: &Order,
    transition: &Transition,
    actor: &Actor,
    at: DateTime<Utc>,
) -> Result<Order, LifecycleError> {
    match transition {
        Transition::Assign { rider } => assign(order, rider.clone(), actor, at),
        Transition::Pick => pick(order, actor, at),
        Transition::Deliver => deliver(order, actor, at),
        Transition::Cancel => cancel(order, actor, at),
    }
}

fn ensure_edge(order: &Order, transition: TransitionKind) -> Result<(), LifecycleError> {
    match transition.target(order.status()) {
        Some(_) => Ok(()),
        None => Err(LifecycleError::InvalidTransition {
            from: order.status(),
            transition,
        }),
    }
}

fn ensure_role(actor: &Actor, transition: TransitionKind) -> Result<(), LifecycleError> {
    if transition.permits(actor.role) {
        Ok(())
    } else {
        Err(unauthorized(actor, transition))
    }
}

/// Buyers and sellers act only on their own orders. Admins act on any.
fn ensure_party(order: &Order, actor: &Actor, transition: TransitionKind) -> Result<(), LifecycleError> {
    let own = match actor.role {
        Role::Admin => true,
        Role::Buyer => order.buyer().is_user(&actor.id),
        Role::Seller => order.seller().is_user(&actor.id),
        Role::Rider => false,
    };
    if own {
        Ok(())
    } else {
        Err(unauthorized(actor, transition))
    }
}

fn ensure_assigned_rider(
    order: &Order,
    actor: &Actor,
    transition: TransitionKind,
) -> Result<RiderId, LifecycleError> {
    ensure_role(actor, transition)?;
    match order.rider() {
        Some(rider) if actor.role == Role::Rider && rider.is_user(&actor.id) => Ok(rider.clone()),
        _ => Err(unauthorized(actor, transition)),
    }
}

fn check_rider(order: &Order, rider: &RiderId) -> Result<(), LifecycleError> {
    let reason = if rider.is_blank() {
        "rider id is empty"
    } else if rider.same_user_as_buyer(order.buyer()) {
        "rider is the buyer of this order"
    } else if rider.same_user_as_seller(order.seller()) {
        "rider is the seller of this order"
    } else {
        return Ok(());
    };
    Err(LifecycleError::InvalidAssignment {
        rider: rider.clone(),
        reason,
    })
}

fn unauthorized(actor: &Actor, transition: TransitionKind) -> LifecycleError {
    LifecycleError::Unauthorized {
        actor: actor.id.clone(),
        role: actor.role,
        transition,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::fixtures::{pending_order, t0};
    use crate::domain::OrderStatus;
    use chrono::Duration;

    fn later(minutes: i64) -> DateTime<Utc> {
        t0() + Duration::minutes(minutes)
    }

    fn assigned_to_r1() -> Order {
        assign(&pending_order(), RiderId::new("R1"), &Actor::seller("S1"), later(1)).unwrap()
    }

    fn picked_by_r1() -> Order {
        pick(&assigned_to_r1(), &Actor::rider("R1"), later(2)).unwrap()
    }

    fn delivered_by_r1() -> Order {
        deliver(&picked_by_r1(), &Actor::rider("R1"), later(3)).unwrap()
    }

    fn cancelled() -> Order {
        cancel(&pending_order(), &Actor::buyer("B1"), later(1)).unwrap()
    }

    fn all_transitions() -> Vec<(Transition, Actor)> {
        vec![
            (
                Transition::Assign {
                    rider: RiderId::new("R9"),
                },
                Actor::admin("A1"),
            ),
            (Transition::Pick, Actor::rider("R1")),
            (Transition::Deliver, Actor::rider("R1")),
            (Transition::Cancel, Actor::admin("A1")),
        ]
    }

    #[test]
    fn seller_scenario_walkthrough() {
        let order = pending_order();

        let order = assign(&order, RiderId::new("R1"), &Actor::seller("S1"), later(1)).unwrap();
        assert_eq!(order.status(), OrderStatus::Assigned);
        assert_eq!(order.rider(), Some(&RiderId::new("R1")));

        let err = pick(&order, &Actor::rider("R2"), later(2)).unwrap_err();
        assert!(matches!(err, LifecycleError::Unauthorized { .. }));

        let order = pick(&order, &Actor::rider("R1"), later(2)).unwrap();
        assert_eq!(order.status(), OrderStatus::Picked);

        let err = cancel(&order, &Actor::rider("R1"), later(3)).unwrap_err();
        assert!(matches!(err, LifecycleError::Unauthorized { .. }));

        let order = cancel(&order, &Actor::buyer("B1"), later(3)).unwrap();
        assert_eq!(order.status(), OrderStatus::Cancelled);
        assert!(order.rider().is_none());
    }

    #[test]
    fn happy_path_keeps_the_assigned_rider() {
        let order = delivered_by_r1();
        assert_eq!(order.status(), OrderStatus::Delivered);
        assert_eq!(order.rider(), Some(&RiderId::new("R1")));
        assert_eq!(order.updated_at(), later(3));
        assert_eq!(order.created_at(), t0());
    }

    #[test]
    fn terminal_states_reject_every_transition() {
        for terminal in [delivered_by_r1(), cancelled()] {
            for (transition, actor) in all_transitions() {
                let err = apply(&terminal, &transition, &actor, later(10)).unwrap_err();
                assert_eq!(
                    err,
                    LifecycleError::InvalidTransition {
                        from: terminal.status(),
                        transition: transition.kind(),
                    }
                );
            }
        }
    }

    #[test]
    fn cancel_is_legal_from_every_open_state() {
        for order in [pending_order(), assigned_to_r1(), picked_by_r1()] {
            for actor in [Actor::buyer("B1"), Actor::seller("S1"), Actor::admin("A1")] {
                let next = cancel(&order, &actor, later(5)).unwrap();
                assert_eq!(next.status(), OrderStatus::Cancelled);
                assert!(next.rider().is_none());
                assert_eq!(next.updated_at(), later(5));
            }
        }
    }

    #[test]
    fn rider_cannot_be_buyer_or_seller_whatever_the_role() {
        let order = pending_order();
        for actor in [
            Actor::seller("S1"),
            Actor::admin("A1"),
            Actor::buyer("B1"),
            Actor::rider("R1"),
        ] {
            for rider in ["B1", "S1"] {
                let err = assign(&order, RiderId::new(rider), &actor, later(1)).unwrap_err();
                assert!(
                    matches!(err, LifecycleError::InvalidAssignment { .. }),
                    "{actor:?} assigning {rider}: {err:?}"
                );
            }
        }
    }

    #[test]
    fn empty_rider_is_an_invalid_assignment() {
        let err = assign(&pending_order(), RiderId::new(""), &Actor::admin("A1"), later(1))
            .unwrap_err();
        assert_eq!(
            err,
            LifecycleError::InvalidAssignment {
                rider: RiderId::new(""),
                reason: "rider id is empty",
            }
        );
    }

    #[test]
    fn only_sellers_and_admins_assign() {
        for actor in [Actor::buyer("B1"), Actor::rider("R1")] {
            let err = assign(&pending_order(), RiderId::new("R1"), &actor, later(1)).unwrap_err();
            assert!(matches!(err, LifecycleError::Unauthorized { .. }));
        }
        let order = assign(&pending_order(), RiderId::new("R1"), &Actor::admin("A1"), later(1));
        assert!(order.is_ok());
    }

    #[test]
    fn buyers_and_sellers_act_only_on_their_own_orders() {
        let order = pending_order();

        let err = assign(&order, RiderId::new("R1"), &Actor::seller("S2"), later(1)).unwrap_err();
        assert_eq!(
            err,
            LifecycleError::Unauthorized {
                actor: "S2".into(),
                role: Role::Seller,
                transition: TransitionKind::Assign,
            }
        );

        for actor in [Actor::buyer("B2"), Actor::seller("S2"), Actor::buyer("S1"), Actor::seller("B1")] {
            let err = cancel(&assigned_to_r1(), &actor, later(2)).unwrap_err();
            assert!(matches!(err, LifecycleError::Unauthorized { .. }), "{actor:?}");
        }

        let next = cancel(&order, &Actor::admin("A9"), later(2)).unwrap();
        assert_eq!(next.status(), OrderStatus::Cancelled);
    }

    #[test]
    fn assign_on_assigned_order_is_invalid_transition() {
        let err = assign(&assigned_to_r1(), RiderId::new("R2"), &Actor::admin("A1"), later(2))
            .unwrap_err();
        assert_eq!(
            err,
            LifecycleError::InvalidTransition {
                from: OrderStatus::Assigned,
                transition: TransitionKind::Assign,
            }
        );
    }

    #[test]
    fn only_the_assigned_rider_moves_the_order() {
        let assigned = assigned_to_r1();
        for actor in [Actor::rider("R2"), Actor::admin("R1"), Actor::seller("S1")] {
            let err = pick(&assigned, &actor, later(2)).unwrap_err();
            assert!(matches!(err, LifecycleError::Unauthorized { .. }), "{actor:?}");
        }

        let picked = picked_by_r1();
        let err = deliver(&picked, &Actor::rider("R2"), later(3)).unwrap_err();
        assert_eq!(
            err,
            LifecycleError::Unauthorized {
                actor: "R2".into(),
                role: Role::Rider,
                transition: TransitionKind::Deliver,
            }
        );
    }

    #[test]
    fn out_of_order_steps_are_invalid_transitions() {
        let err = pick(&pending_order(), &Actor::rider("R1"), later(1)).unwrap_err();
        assert!(matches!(err, LifecycleError::InvalidTransition { .. }));

        let err = deliver(&assigned_to_r1(), &Actor::rider("R1"), later(2)).unwrap_err();
        assert!(matches!(err, LifecycleError::InvalidTransition { .. }));
    }

    #[test]
    fn rejected_transition_leaves_input_untouched() {
        let order = assigned_to_r1();
        let before = order.clone();
        let _ = pick(&order, &Actor::rider("R2"), later(9));
        assert_eq!(order, before);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn actor_strategy() -> impl Strategy<Value = Actor> {
            prop_oneof![
                Just(Actor::buyer("B1")),
                Just(Actor::seller("S1")),
                Just(Actor::rider("R1")),
                Just(Actor::rider("R2")),
                Just(Actor::admin("A1")),
            ]
        }

        fn transition_strategy() -> impl Strategy<Value = Transition> {
            prop_oneof![
                prop_oneof![Just("R1"), Just("R2"), Just("B1"), Just("S1"), Just("")]
                    .prop_map(|r| Transition::Assign { rider: RiderId::new(r) }),
                Just(Transition::Pick),
                Just(Transition::Deliver),
                Just(Transition::Cancel),
            ]
        }

        proptest! {
            #[test]
            fn random_sequences_preserve_invariants(
                steps in prop::collection::vec((transition_strategy(), actor_strategy()), 0..24)
            ) {
                let original = pending_order();
                let mut order = original.clone();
                let mut assigned_rider: Option<RiderId> = None;

                for (i, (transition, actor)) in steps.iter().enumerate() {
                    let before = order.status();
                    match apply(&order, transition, actor, later(i as i64 + 1)) {
                        Ok(next) => {
                            prop_assert!(!before.is_terminal());
                            prop_assert_eq!(transition.kind().target(before), Some(next.status()));
                            if let Transition::Assign { rider } = transition {
                                assigned_rider = Some(rider.clone());
                            }
                            order = next;
                        }
                        Err(LifecycleError::InvalidTransition { from, .. }) => {
                            prop_assert_eq!(from, before);
                            prop_assert!(transition.kind().target(before).is_none());
                        }
                        Err(_) => {}
                    }

                    let status = order.status();
                    prop_assert_eq!(status == OrderStatus::Pending, order.rider().is_none() && status != OrderStatus::Cancelled);
                    match status {
                        OrderStatus::Assigned | OrderStatus::Picked | OrderStatus::Delivered => {
                            prop_assert_eq!(order.rider(), assigned_rider.as_ref());
                            let rider = order.rider().unwrap();
                            prop_assert!(!rider.same_user_as_buyer(order.buyer()));
                            prop_assert!(!rider.same_user_as_seller(order.seller()));
                        }
                        OrderStatus::Pending | OrderStatus::Cancelled => {
                            prop_assert!(order.rider().is_none());
                        }
                    }
                    prop_assert!(original.same_terms(&order));
                }
            }
        }
    }
}
