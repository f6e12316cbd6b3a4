mod common;

use as_any::AsAny;
use dmr_core::{
    DMR_SYNC_AUDIO, DMR_SYNC_DATA, DT_TERMINATOR_WITH_LC, DT_VOICE, DT_VOICE_LC_HEADER, DT_VOICE_SYNC, DmrData, Flco,
    SlotId, TAG_DATA, TrafficSource,
};
use dmr_entities::RelaySlot;
use dmr_pdus::lc::FullLc;
use tracing::Level;

use common::fakes::DisplayEvent;
use common::{Bench, capture_logs, count_level, default_test_config};

const BOB: u32 = 2_351_111;

fn lc_frame(data_type: u8, src: u32, tg: u32) -> Vec<u8> {
    let mut frame = vec![0u8; 35];
    frame[0] = TAG_DATA;
    frame[1] = DMR_SYNC_DATA | data_type;
    FullLc::new(Flco::Group, src, tg).to_burst(&mut frame[2..]);
    frame
}

fn voice_frame(flags: u8) -> Vec<u8> {
    let mut frame = vec![0x5Au8; 35];
    frame[0] = TAG_DATA;
    frame[1] = flags;
    frame
}

fn net_frame(slot_no: u8, data_type: u8, dst_id: u32) -> DmrData {
    DmrData { slot_no, src_id: BOB, dst_id, data_type, stream_id: 0x1234, ..Default::default() }
}

fn buffered(bench: &Bench, slot: SlotId) -> usize {
    bench
        .dispatcher
        .slot(slot)
        .as_any()
        .downcast_ref::<RelaySlot>()
        .expect("relay slot")
        .jitter_len()
}

fn drain_tx(bench: &mut Bench, slot: SlotId) -> Vec<Vec<u8>> {
    let mut frames = vec![];
    let mut out = [0u8; 40];
    loop {
        let len = bench.dispatcher.read_modem_slot(slot, &mut out);
        if len == 0 {
            return frames;
        }
        frames.push(out[..len].to_vec());
    }
}

#[test]
fn test_rf_call_repeated_and_forwarded() {
    let mut bench = Bench::relay(default_test_config(), true);

    // Voice header with RSSI attached
    let mut header = lc_frame(DT_VOICE_LC_HEADER, BOB, 91);
    header.extend_from_slice(&[0x00, 0x50]);
    bench.dispatcher.write_modem_slot(SlotId::One, &header);
    bench.dispatcher.write_modem_slot(SlotId::One, &voice_frame(DMR_SYNC_AUDIO));
    bench.dispatcher.write_modem_slot(SlotId::One, &voice_frame(0x01));
    bench.dispatcher.write_modem_slot(SlotId::One, &lc_frame(DT_TERMINATOR_WITH_LC, BOB, 91));

    let tx = drain_tx(&mut bench, SlotId::One);
    assert_eq!(tx.len(), 4);
    assert!(tx.iter().all(|f| f.len() == 35));
    assert_eq!(tx[0][1], DMR_SYNC_DATA | DT_VOICE_LC_HEADER);
    assert_eq!(&tx[0][2..], &header[2..35]);
    assert!(drain_tx(&mut bench, SlotId::Two).is_empty());

    let net = bench.network.as_ref().unwrap().lock().unwrap();
    let types: Vec<u8> = net.written.iter().map(|d| d.data_type).collect();
    assert_eq!(types, vec![DT_VOICE_LC_HEADER, DT_VOICE_SYNC, DT_VOICE, DT_TERMINATOR_WITH_LC]);
    assert!(net.written.iter().all(|d| d.slot_no == 1 && d.src_id == BOB && d.dst_id == 91 && d.is_group()));
    assert!(net.written.iter().all(|d| d.stream_id == net.written[0].stream_id));
    assert_eq!(net.written[2].n, 1);
    drop(net);

    assert_eq!(
        bench.display.take(),
        vec![
            DisplayEvent::Write { slot: SlotId::One, source: TrafficSource::Rf, src: "M0XYZ".to_string(), group: true, dst: "91".to_string() },
            DisplayEvent::Clear(SlotId::One),
        ]
    );
}

#[test]
fn test_rf_call_rejected() {
    let mut cfg = default_test_config();
    cfg.access.slot1_rf.blacklist = vec![9];
    let mut bench = Bench::relay(cfg, true);

    let (_, logs) = capture_logs(|| {
        bench.dispatcher.write_modem_slot(SlotId::One, &lc_frame(DT_VOICE_LC_HEADER, BOB, 9));
        bench.dispatcher.write_modem_slot(SlotId::One, &voice_frame(DMR_SYNC_AUDIO));
    });
    assert_eq!(count_level(&logs, Level::WARN), 1);

    assert!(drain_tx(&mut bench, SlotId::One).is_empty());
    assert_eq!(bench.modem.lock().unwrap().aborts, vec![SlotId::One]);
    assert!(bench.network.as_ref().unwrap().lock().unwrap().written.is_empty());
    assert!(bench.display.take().is_empty());

    // Same talkgroup is fine on the other slot
    bench.dispatcher.write_modem_slot(SlotId::Two, &lc_frame(DT_VOICE_LC_HEADER, BOB, 9));
    assert_eq!(drain_tx(&mut bench, SlotId::Two).len(), 1);
}

#[test]
fn test_simplex_does_not_repeat() {
    let mut cfg = default_test_config();
    cfg.duplex = false;
    let mut bench = Bench::relay(cfg, true);

    bench.dispatcher.write_modem_slot(SlotId::Two, &lc_frame(DT_VOICE_LC_HEADER, BOB, 91));
    bench.dispatcher.write_modem_slot(SlotId::Two, &voice_frame(DMR_SYNC_AUDIO));

    assert!(drain_tx(&mut bench, SlotId::Two).is_empty());
    let net = bench.network.as_ref().unwrap().lock().unwrap();
    assert_eq!(net.written.len(), 2);
    assert!(net.written.iter().all(|d| d.slot_no == 2));
}

#[test]
fn test_net_jitter_buffer() {
    // 180 ms is three frames
    let mut bench = Bench::relay(default_test_config(), true);
    bench.push_network(net_frame(2, DT_VOICE_SYNC, 91));
    bench.push_network(net_frame(2, DT_VOICE, 91));
    bench.push_network(net_frame(2, DT_VOICE, 91));

    bench.dispatcher.clock();
    bench.dispatcher.clock();
    assert!(drain_tx(&mut bench, SlotId::Two).is_empty());
    assert_eq!(buffered(&bench, SlotId::Two), 2);

    bench.dispatcher.clock();
    let tx = drain_tx(&mut bench, SlotId::Two);
    assert_eq!(tx.len(), 1);
    assert_eq!(buffered(&bench, SlotId::Two), 2);
    assert_eq!(tx[0][0], TAG_DATA);
    assert_eq!(tx[0][1], DMR_SYNC_AUDIO);

    // One frame per clock from here on
    bench.dispatcher.clock();
    assert_eq!(drain_tx(&mut bench, SlotId::Two).len(), 1);

    assert_eq!(
        bench.display.take(),
        vec![DisplayEvent::Write { slot: SlotId::Two, source: TrafficSource::Net, src: "M0XYZ".to_string(), group: true, dst: "91".to_string() }]
    );
}

#[test]
fn test_net_terminator_flushes() {
    let mut bench = Bench::relay(default_test_config(), true);
    bench.push_network(net_frame(2, DT_VOICE_LC_HEADER, 91));
    bench.push_network(net_frame(2, DT_TERMINATOR_WITH_LC, 91));

    bench.dispatcher.clock();
    assert!(drain_tx(&mut bench, SlotId::Two).is_empty());

    bench.dispatcher.clock();
    let tx = drain_tx(&mut bench, SlotId::Two);
    assert_eq!(tx.len(), 1);
    assert_eq!(tx[0][1], DMR_SYNC_DATA | DT_VOICE_LC_HEADER);

    bench.dispatcher.clock();
    let tx = drain_tx(&mut bench, SlotId::Two);
    assert_eq!(tx.len(), 1);
    assert_eq!(tx[0][1], DMR_SYNC_DATA | DT_TERMINATOR_WITH_LC);

    assert_eq!(bench.display.take().last(), Some(&DisplayEvent::Clear(SlotId::Two)));
}

#[test]
fn test_net_whitelist() {
    let mut cfg = default_test_config();
    cfg.access.slot1_net.whitelist = vec![91];
    let mut bench = Bench::relay(cfg, true);

    for _ in 0..4 {
        bench.push_network(net_frame(1, DT_VOICE, 92));
    }
    for _ in 0..8 {
        bench.dispatcher.clock();
    }
    assert!(drain_tx(&mut bench, SlotId::One).is_empty());
    assert!(bench.display.take().is_empty());
}

#[test]
fn test_rf_has_priority_over_net() {
    let mut bench = Bench::relay(default_test_config(), true);
    bench.dispatcher.write_modem_slot(SlotId::One, &lc_frame(DT_VOICE_LC_HEADER, BOB, 91));
    assert_eq!(drain_tx(&mut bench, SlotId::One).len(), 1);

    for _ in 0..4 {
        bench.push_network(net_frame(1, DT_VOICE, 92));
    }
    for _ in 0..8 {
        bench.dispatcher.clock();
    }
    assert!(drain_tx(&mut bench, SlotId::One).is_empty());
}

#[test]
fn test_net_stream_replaced_without_terminator() {
    let mut bench = Bench::relay(default_test_config(), true);
    bench.push_network(net_frame(2, DT_VOICE_SYNC, 91));
    bench.push_network(net_frame(2, DT_VOICE, 91));
    bench.push_network(DmrData { stream_id: 0x5678, ..net_frame(2, DT_VOICE_SYNC, 92) });

    let (_, logs) = capture_logs(|| {
        for _ in 0..3 {
            bench.dispatcher.clock();
        }
    });

    assert!(logs.iter().any(|e| e.level == Level::INFO && e.message.contains("transmission lost")));
    assert!(logs.iter().any(|e| e.level == Level::DEBUG && e.message.contains("Dropping 2 buffered frames")));
    assert_eq!(
        bench.display.take(),
        vec![
            DisplayEvent::Write { slot: SlotId::Two, source: TrafficSource::Net, src: "M0XYZ".to_string(), group: true, dst: "91".to_string() },
            DisplayEvent::Clear(SlotId::Two),
            DisplayEvent::Write { slot: SlotId::Two, source: TrafficSource::Net, src: "M0XYZ".to_string(), group: true, dst: "92".to_string() },
        ]
    );

    let slot = bench.dispatcher.slot(SlotId::Two).as_any().downcast_ref::<RelaySlot>().expect("relay slot");
    assert!(slot.is_net_active());
    assert_eq!(slot.jitter_len(), 1);
    assert!(drain_tx(&mut bench, SlotId::Two).is_empty());
}
