use std::io::Read;
use std::net::TcpListener;
use std::thread;

use onemax::{
    error::GeneticError,
    evolution::{EvolutionConfig, EvolutionLoop, LogLevel, SinkConfig},
    rng::RandomNumberGenerator,
    sink::{IndividualRecord, PersistenceSink, TcpSink},
};

#[test]
fn test_tcp_sink_opens_one_connection_per_record() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let server = thread::spawn(move || {
        let mut received = Vec::new();
        for _ in 0..2 {
            let (mut stream, _) = listener.accept().unwrap();
            let mut body = String::new();
            stream.read_to_string(&mut body).unwrap();
            let record: IndividualRecord = serde_json::from_str(&body).unwrap();
            received.push(record);
        }
        received
    });

    let mut sink = TcpSink::new("127.0.0.1", port, "onemax-test");
    let first = IndividualRecord {
        entities: vec![1, 0, 1],
        amount: 3,
        fitness: 2,
        generation: 1,
    };
    let second = IndividualRecord {
        entities: vec![1, 1, 1],
        amount: 3,
        fitness: 3,
        generation: 1,
    };
    sink.persist(&first).unwrap();
    sink.persist(&second).unwrap();

    let received = server.join().unwrap();
    assert_eq!(received, vec![first, second]);
}

#[test]
fn test_tcp_sink_reports_connection_failure() {
    // bind then drop to get a port nobody listens on
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let mut sink = TcpSink::new("127.0.0.1", port, "onemax-test");
    let record = IndividualRecord {
        entities: vec![0],
        amount: 1,
        fitness: 0,
        generation: 0,
    };
    assert!(matches!(
        sink.persist(&record),
        Err(GeneticError::Persistence(msg)) if msg.contains("Failed to connect")
    ));
}

#[test]
fn test_loop_keeps_running_when_sink_is_unreachable() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let sink_config = SinkConfig {
        host: "127.0.0.1".to_string(),
        port,
        ..SinkConfig::default()
    };
    let config = EvolutionConfig::builder()
        .population_size(4)
        .genome_length(8)
        .desired_fitness(8.0)
        .stop_at_first_perfect(false)
        .max_generations(2)
        .log_level(LogLevel::None)
        .sink(sink_config)
        .build();
    let sink = TcpSink::from_config(config.get_sink());
    assert_eq!(sink.index(), "logstash-ec");

    let mut evolution =
        EvolutionLoop::new(config, RandomNumberGenerator::from_seed(4), sink).unwrap();
    let outcome = evolution.run().unwrap();
    assert!(outcome.generation >= 1);
}
