// [tests/mirror/libs/core/flow_control/single_flight.test.rs]
/**
 * =================================================================
 * APARATO: SINGLE FLIGHT TEST (V2.0)
 * CLASIFICACIÓN: TRINITY EVIDENCE // ESTRATO L1-MIRROR
 * RESPONSABILIDAD: CERTIFICACIÓN DE DEDUPLICACIÓN POR CLAVE
 * =================================================================
 */

use pulse_core_flow::KeyedSingleFlight;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn certify_concurrent_callers_share_one_execution() {
    println!("\n🛫 [PROVING_GROUNDS]: Auditing keyed deduplication...");

    // 1. SETUP: Operación instrumentada con contador de ejecuciones
    let flights: Arc<KeyedSingleFlight<u64>> = Arc::new(KeyedSingleFlight::new());
    let execution_counter = Arc::new(AtomicUsize::new(0));

    // 2. EXECUTION: Ocho llamadores concurrentes de la misma clave
    let mut caller_handles = Vec::new();
    for _ in 0..8 {
        let flights_reference = Arc::clone(&flights);
        let counter_reference = Arc::clone(&execution_counter);
        caller_handles.push(tokio::spawn(async move {
            flights_reference
                .run("ISX1M02LYE1F9QJHR9D", move || async move {
                    counter_reference.fetch_add(1, Ordering::SeqCst);
                    // Vuelo deliberadamente lento para solapar llegadas
                    tokio::time::sleep(Duration::from_millis(120)).await;
                    4242u64
                })
                .await
        }));
    }

    // 3. VALIDATION: Una ejecución, ocho desenlaces idénticos
    for handle in caller_handles {
        assert_eq!(handle.await.unwrap(), Some(4242), "L1_OUTCOME_FAULT: Shared value lost.");
    }
    assert_eq!(
        execution_counter.load(Ordering::SeqCst),
        1,
        "L1_DEDUP_FAULT: Exactly one flight must execute for the key."
    );

    println!("   ✅ [SUCCESS]: Single-flight strata levelized.");
}

#[tokio::test]
async fn certify_distinct_keys_fly_independently() {
    let flights: Arc<KeyedSingleFlight<String>> = Arc::new(KeyedSingleFlight::new());
    let execution_counter = Arc::new(AtomicUsize::new(0));

    let mut caller_handles = Vec::new();
    for key_ordinal in 0..4 {
        let flights_reference = Arc::clone(&flights);
        let counter_reference = Arc::clone(&execution_counter);
        caller_handles.push(tokio::spawn(async move {
            let flight_key = format!("KEY-{key_ordinal}");
            flights_reference
                .run(&flight_key, {
                    let flight_key = flight_key.clone();
                    move || async move {
                        counter_reference.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        flight_key
                    }
                })
                .await
        }));
    }

    for (key_ordinal, handle) in caller_handles.into_iter().enumerate() {
        assert_eq!(handle.await.unwrap(), Some(format!("KEY-{key_ordinal}")));
    }
    assert_eq!(execution_counter.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn certify_fresh_flight_after_completion() {
    let flights: KeyedSingleFlight<u32> = KeyedSingleFlight::new();
    let execution_counter = Arc::new(AtomicUsize::new(0));

    for expected_round in 1..=3u32 {
        let counter_reference = Arc::clone(&execution_counter);
        let outcome = flights
            .run("SAME-KEY", move || async move {
                counter_reference.fetch_add(1, Ordering::SeqCst) as u32 + 1
            })
            .await;
        assert_eq!(outcome, Some(expected_round), "L1_FRESHNESS_FAULT: Round {expected_round}.");
    }

    // Cada ronda secuencial abre vuelo propio (sin canal drenado)
    assert_eq!(execution_counter.load(Ordering::SeqCst), 3);
}
