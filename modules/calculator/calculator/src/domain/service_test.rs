#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::super::*;
    use async_trait::async_trait;
    use calculator_sdk::{
        CalculationError, CalculatorClientV1, HistoryRecord, NewHistoryRecord, Operator,
    };
    use input::{Digit, InputEvent};
    use parking_lot::Mutex;
    use repo::HistoryRepository;
    use service::{Calculator, ERROR_DISPLAY, InputState};
    use session::{CalculatorSession, SessionError};
    use std::collections::VecDeque;
    use std::sync::Arc;
    use std::time::Duration;
    use tracing_test::traced_test;

    use crate::infra::storage::InMemoryHistoryRepository;

    type Call = (Operator, f64, f64, u32);

    /// Replays scripted outcomes in order and records every call.
    #[derive(Default)]
    struct ScriptedClient {
        outcomes: Mutex<VecDeque<Result<f64, CalculationError>>>,
        calls: Mutex<Vec<Call>>,
        delay: Option<Duration>,
    }

    impl ScriptedClient {
        fn new(outcomes: Vec<Result<f64, CalculationError>>) -> Arc<Self> {
            Arc::new(Self {
                outcomes: Mutex::new(outcomes.into()),
                ..Self::default()
            })
        }

        fn slow(outcome: Result<f64, CalculationError>, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                outcomes: Mutex::new(VecDeque::from([outcome])),
                delay: Some(delay),
                ..Self::default()
            })
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl CalculatorClientV1 for ScriptedClient {
        async fn calculate(
            &self,
            operator: Operator,
            a: f64,
            b: f64,
            precision: u32,
        ) -> Result<f64, CalculationError> {
            self.calls.lock().push((operator, a, b, precision));
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.outcomes
                .lock()
                .pop_front()
                .unwrap_or(Err(CalculationError::NoConnection))
        }
    }

    struct FailingRepository;

    #[async_trait]
    impl HistoryRepository for FailingRepository {
        async fn insert(&self, _record: NewHistoryRecord) -> anyhow::Result<HistoryRecord> {
            anyhow::bail!("disk full")
        }

        async fn list(&self) -> anyhow::Result<Vec<HistoryRecord>> {
            anyhow::bail!("disk full")
        }

        async fn delete_all(&self) -> anyhow::Result<u64> {
            anyhow::bail!("disk full")
        }
    }

    fn calculator(
        client: &Arc<ScriptedClient>,
        history: &Arc<InMemoryHistoryRepository>,
    ) -> Calculator {
        Calculator::new(client.clone(), history.clone())
    }

    fn digit(d: u8) -> InputEvent {
        InputEvent::Digit(Digit::try_from(d).unwrap())
    }

    async fn press(calc: &mut Calculator, keys: &str) {
        for key in keys.chars() {
            let event = InputEvent::from_key(key).unwrap();
            calc.apply(event).await;
        }
    }

    #[tokio::test]
    async fn initial_state_shows_zero() {
        let calc = calculator(&ScriptedClient::new(vec![]), &Arc::default());
        assert_eq!(calc.state(), &InputState::default());
        assert_eq!(calc.state().display, "0");
        assert_eq!(calc.precision(), 2);
    }

    #[tokio::test]
    async fn digits_concatenate_and_leading_zero_is_replaced() {
        let mut calc = calculator(&ScriptedClient::new(vec![]), &Arc::default());
        press(&mut calc, "0").await;
        assert_eq!(calc.state().display, "0");
        press(&mut calc, "5").await;
        assert_eq!(calc.state().display, "5");
        press(&mut calc, "07").await;
        assert_eq!(calc.state().display, "507");
    }

    #[tokio::test]
    async fn decimal_point_is_added_once() {
        let mut calc = calculator(&ScriptedClient::new(vec![]), &Arc::default());
        press(&mut calc, ".").await;
        assert_eq!(calc.state().display, "0.");
        press(&mut calc, "5.2.").await;
        assert_eq!(calc.state().display, "0.52");
    }

    #[tokio::test]
    async fn add_then_equals_displays_and_records() {
        let client = ScriptedClient::new(vec![Ok(5.0)]);
        let history = Arc::new(InMemoryHistoryRepository::new());
        let mut calc = calculator(&client, &history);

        press(&mut calc, "2+3=").await;

        assert_eq!(client.calls(), vec![(Operator::Add, 2.0, 3.0, 2)]);
        let state = calc.state();
        assert_eq!(state.display, "5");
        assert!(state.first_operand.is_none());
        assert!(state.pending_operator.is_none());
        assert!(state.awaiting_second_operand);
        assert!(state.error_message.is_none());

        let records = history.list().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].operator, Operator::Add);
        assert_eq!(records[0].operator.symbol(), "+");
        assert_eq!(
            (records[0].operand_a, records[0].operand_b, records[0].result),
            (2.0, 3.0, 5.0)
        );
    }

    #[tokio::test]
    async fn division_by_zero_shows_server_message() {
        let client = ScriptedClient::new(vec![Err(CalculationError::CalculationFailed(
            "division by zero".to_owned(),
        ))]);
        let history = Arc::new(InMemoryHistoryRepository::new());
        let mut calc = calculator(&client, &history);

        press(&mut calc, "7/0=").await;

        assert_eq!(client.calls(), vec![(Operator::Div, 7.0, 0.0, 2)]);
        assert_eq!(calc.state().display, ERROR_DISPLAY);
        assert_eq!(
            calc.state().error_message.as_deref(),
            Some("division by zero")
        );
        assert!(history.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn chained_operators_fold_pending_pair() {
        let client = ScriptedClient::new(vec![Ok(5.0), Ok(20.0)]);
        let history = Arc::new(InMemoryHistoryRepository::new());
        let mut calc = calculator(&client, &history);

        press(&mut calc, "2+").await;
        assert_eq!(calc.state().first_operand, Some(2.0));
        assert!(client.calls().is_empty());

        press(&mut calc, "3*").await;
        assert_eq!(calc.state().first_operand, Some(5.0));
        assert_eq!(calc.state().pending_operator, Some(Operator::Mul));
        assert_eq!(calc.state().display, "5");

        press(&mut calc, "4=").await;
        assert_eq!(calc.state().display, "20");
        assert_eq!(
            client.calls(),
            vec![(Operator::Add, 2.0, 3.0, 2), (Operator::Mul, 5.0, 4.0, 2)]
        );

        let records = history.list().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].operator, Operator::Mul);
        assert_eq!(
            (records[0].operand_a, records[0].operand_b, records[0].result),
            (5.0, 4.0, 20.0)
        );
    }

    #[tokio::test]
    async fn equals_right_after_operator_reuses_display() {
        let client = ScriptedClient::new(vec![Ok(81.0)]);
        let mut calc = calculator(&client, &Arc::default());

        press(&mut calc, "9*=").await;

        assert_eq!(client.calls(), vec![(Operator::Mul, 9.0, 9.0, 2)]);
        assert_eq!(calc.state().display, "81");
    }

    #[tokio::test]
    async fn equals_without_pending_operator_is_noop() {
        let client = ScriptedClient::new(vec![]);
        let mut calc = calculator(&client, &Arc::default());

        press(&mut calc, "42=").await;

        assert!(client.calls().is_empty());
        assert_eq!(calc.state().display, "42");
        assert!(!calc.state().awaiting_second_operand);
    }

    #[tokio::test]
    async fn fractional_result_uses_two_decimals() {
        let client = ScriptedClient::new(vec![Ok(4.5)]);
        let mut calc = calculator(&client, &Arc::default());

        press(&mut calc, "9/2=").await;

        assert_eq!(calc.state().display, "4.50");
    }

    #[tokio::test]
    async fn digit_after_result_starts_new_number() {
        let client = ScriptedClient::new(vec![Ok(5.0)]);
        let mut calc = calculator(&client, &Arc::default());

        press(&mut calc, "2+3=").await;
        calc.apply(digit(7)).await;

        assert_eq!(calc.state().display, "7");
        assert!(!calc.state().awaiting_second_operand);
    }

    #[tokio::test]
    async fn result_can_start_next_chain() {
        let client = ScriptedClient::new(vec![Ok(5.0), Ok(10.0)]);
        let mut calc = calculator(&client, &Arc::default());

        press(&mut calc, "2+3=*2=").await;

        assert_eq!(
            client.calls(),
            vec![(Operator::Add, 2.0, 3.0, 2), (Operator::Mul, 5.0, 2.0, 2)]
        );
        assert_eq!(calc.state().display, "10");
    }

    #[tokio::test]
    async fn decimal_after_operator_starts_fraction() {
        let client = ScriptedClient::new(vec![Ok(1.5)]);
        let mut calc = calculator(&client, &Arc::default());

        press(&mut calc, "1+.5=").await;

        assert_eq!(client.calls(), vec![(Operator::Add, 1.0, 0.5, 2)]);
        assert_eq!(calc.state().display, "1.50");
    }

    #[tokio::test]
    async fn failed_chain_step_does_not_record_new_operator() {
        let client = ScriptedClient::new(vec![Err(CalculationError::NoConnection)]);
        let history = Arc::new(InMemoryHistoryRepository::new());
        let mut calc = calculator(&client, &history);

        press(&mut calc, "2+3*").await;

        let state = calc.state();
        assert_eq!(state.display, ERROR_DISPLAY);
        assert_eq!(state.error_message.as_deref(), Some("Server unavailable"));
        assert_ne!(state.pending_operator, Some(Operator::Mul));
        assert!(state.pending_operator.is_none());
        assert!(state.first_operand.is_none());
        assert!(!state.awaiting_second_operand);
        assert!(history.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unavailable_errors_share_generic_banner() {
        for err in [
            CalculationError::InvalidEndpoint,
            CalculationError::NoConnection,
            CalculationError::InvalidResponse,
            CalculationError::ServerError(502),
        ] {
            let client = ScriptedClient::new(vec![Err(err)]);
            let mut calc = calculator(&client, &Arc::default());
            press(&mut calc, "1+1=").await;
            assert_eq!(
                calc.state().error_message.as_deref(),
                Some("Server unavailable")
            );
            assert_eq!(calc.state().display, ERROR_DISPLAY);
        }
    }

    #[tokio::test]
    async fn digit_clears_error_and_starts_fresh() {
        let client = ScriptedClient::new(vec![Err(CalculationError::NoConnection), Ok(9.0)]);
        let mut calc = calculator(&client, &Arc::default());

        press(&mut calc, "1+1=").await;
        assert!(calc.state().is_error());

        press(&mut calc, "4").await;
        assert!(!calc.state().is_error());
        assert_eq!(calc.state().display, "4");

        press(&mut calc, "+5=").await;
        assert_eq!(calc.state().display, "9");
        assert_eq!(client.calls()[1], (Operator::Add, 4.0, 5.0, 2));
    }

    #[tokio::test]
    async fn decimal_clears_error() {
        let client = ScriptedClient::new(vec![Err(CalculationError::NoConnection)]);
        let mut calc = calculator(&client, &Arc::default());

        press(&mut calc, "1+1=.").await;

        assert!(!calc.state().is_error());
        assert_eq!(calc.state().display, "0.");
    }

    #[tokio::test]
    async fn operator_after_error_starts_from_zero() {
        let client = ScriptedClient::new(vec![Err(CalculationError::NoConnection), Ok(3.0)]);
        let mut calc = calculator(&client, &Arc::default());

        press(&mut calc, "1+1=").await;
        press(&mut calc, "+3=").await;

        assert_eq!(client.calls()[1], (Operator::Add, 0.0, 3.0, 2));
        assert_eq!(calc.state().display, "3");
    }

    #[tokio::test]
    async fn clear_resets_everything() {
        let client = ScriptedClient::new(vec![]);
        let mut calc = calculator(&client, &Arc::default());

        press(&mut calc, "12+3").await;
        press(&mut calc, "c").await;

        assert_eq!(calc.state(), &InputState::default());
    }

    #[tokio::test]
    async fn precision_hint_is_forwarded() {
        let client = ScriptedClient::new(vec![Ok(0.3333)]);
        let mut calc = calculator(&client, &Arc::default()).with_precision(4);

        press(&mut calc, "1/3=").await;

        assert_eq!(client.calls(), vec![(Operator::Div, 1.0, 3.0, 4)]);
        assert_eq!(calc.state().display, "0.33");
    }

    #[traced_test]
    #[tokio::test]
    async fn history_failure_is_logged_and_result_kept() {
        let client = ScriptedClient::new(vec![Ok(5.0)]);
        let mut calc = Calculator::new(client, Arc::new(FailingRepository));

        press(&mut calc, "2+3=").await;

        assert_eq!(calc.state().display, "5");
        assert!(!calc.state().is_error());
        assert!(logs_contain("failed to save history record"));
        assert!(logs_contain("disk full"));
    }

    #[tokio::test]
    async fn history_access_goes_through_repository() {
        let client = ScriptedClient::new(vec![Ok(5.0), Ok(6.0)]);
        let history = Arc::new(InMemoryHistoryRepository::new());
        let mut calc = calculator(&client, &history);

        press(&mut calc, "2+3=1+5=").await;

        let listed = calc.history().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].result, 6.0);
        assert_eq!(calc.clear_history().await.unwrap(), 2);
        assert!(calc.history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn session_dispatch_returns_snapshot() {
        let client = ScriptedClient::new(vec![Ok(5.0)]);
        let session = CalculatorSession::new(calculator(&client, &Arc::default()));

        for key in "2+3".chars() {
            session
                .dispatch(InputEvent::from_key(key).unwrap())
                .await
                .unwrap();
        }
        let state = session.dispatch(InputEvent::Equals).await.unwrap();

        assert_eq!(state.display, "5");
        assert_eq!(session.snapshot().await, state);
        assert_eq!(session.history().await.unwrap().len(), 1);
        assert_eq!(session.clear_history().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn session_rejects_input_while_request_in_flight() {
        let client = ScriptedClient::slow(Ok(5.0), Duration::from_millis(200));
        let session = CalculatorSession::new(calculator(&client, &Arc::default()));

        session.dispatch(digit(2)).await.unwrap();
        session
            .dispatch(InputEvent::Operator(Operator::Add))
            .await
            .unwrap();
        session.dispatch(digit(3)).await.unwrap();

        let in_flight = {
            let session = session.clone();
            tokio::spawn(async move { session.dispatch(InputEvent::Equals).await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(
            session.dispatch(digit(9)).await,
            Err(SessionError::Busy)
        );
        assert_eq!(
            session
                .dispatch(InputEvent::Operator(Operator::Mul))
                .await,
            Err(SessionError::Busy)
        );

        let state = in_flight.await.unwrap().unwrap();
        assert_eq!(state.display, "5");
        assert_eq!(client.calls().len(), 1);

        let state = session.dispatch(digit(9)).await.unwrap();
        assert_eq!(state.display, "9");
    }
}
