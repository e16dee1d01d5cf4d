#![allow(dead_code, unreachable_pub)]

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use emvtap_apdu_core::prelude::*;

/// Visa AID used by the fixtures
pub const VISA_AID: &str = "a0000000031010";

/// PDOL asking for TTQ, amount, unpredictable number, currency and country
pub const CONTACTLESS_PDOL: &str = "9f66049f02069f37045f2a029f1a02";

/// Encode a primitive or constructed record with a short-form length
pub fn tlv(tag: &str, value: &[u8]) -> Vec<u8> {
    assert!(value.len() < 0x80, "fixture values use short lengths");
    let mut out = hex::decode(tag).unwrap();
    out.push(value.len() as u8);
    out.extend_from_slice(value);
    out
}

/// Key a scripted answer is looked up by
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Key {
    ins: u8,
    p1: u8,
    p2: u8,
    data: Option<Vec<u8>>,
}

/// Card that answers from a script and remembers what it was sent
#[derive(Debug, Default)]
pub struct ScriptedCard {
    answers: HashMap<Key, Result<Vec<u8>, TransportError>>,
    pub sent: Vec<Command>,
    pub timeouts: Vec<Option<Duration>>,
}

impl ScriptedCard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer SELECT of `name` with `fci` and 90 00
    pub fn select(mut self, name: &[u8], fci: &[u8]) -> Self {
        self.answers.insert(
            Key {
                ins: 0xA4,
                p1: 0x04,
                p2: 0x00,
                data: Some(name.to_vec()),
            },
            Ok(success(fci)),
        );
        self
    }

    /// Answer any GET PROCESSING OPTIONS with `payload` and 90 00
    pub fn gpo(mut self, payload: &[u8]) -> Self {
        self.answers.insert(
            Key {
                ins: 0xA8,
                p1: 0x00,
                p2: 0x00,
                data: None,
            },
            Ok(success(payload)),
        );
        self
    }

    /// Answer READ RECORD of `record` in file `sfi` with `payload` and 90 00
    pub fn record(self, record: u8, sfi: u8, payload: &[u8]) -> Self {
        self.raw(0xB2, record, sfi, Ok(success(payload)))
    }

    /// Answer a command (any data field) with a raw response or an error
    pub fn raw(
        mut self,
        ins: u8,
        p1: u8,
        p2: u8,
        answer: Result<Vec<u8>, TransportError>,
    ) -> Self {
        self.answers.insert(
            Key {
                ins,
                p1,
                p2,
                data: None,
            },
            answer,
        );
        self
    }

    /// Instructions sent, in order
    pub fn instructions(&self) -> Vec<u8> {
        self.sent.iter().map(|command| command.ins).collect()
    }

    /// (P1, P2) of every READ RECORD sent, in order
    pub fn records_read(&self) -> Vec<(u8, u8)> {
        self.sent
            .iter()
            .filter(|command| command.ins == 0xB2)
            .map(|command| (command.p1, command.p2))
            .collect()
    }

    /// Data field of the GET PROCESSING OPTIONS sent, if any
    pub fn gpo_data(&self) -> Option<Vec<u8>> {
        self.sent
            .iter()
            .find(|command| command.ins == 0xA8)
            .and_then(|command| command.data.as_ref().map(|data| data.to_vec()))
    }
}

impl CardTransport for ScriptedCard {
    fn do_transmit_raw(
        &mut self,
        command: &[u8],
        timeout: Option<Duration>,
    ) -> Result<Bytes, TransportError> {
        let command = Command::from_bytes(command).expect("engine sent a malformed APDU");
        self.timeouts.push(timeout);

        let exact = Key {
            ins: command.ins,
            p1: command.p1,
            p2: command.p2,
            data: command.data.as_ref().map(|data| data.to_vec()),
        };
        let any = Key { data: None, ..exact.clone() };
        self.sent.push(command);

        match self.answers.get(&exact).or_else(|| self.answers.get(&any)) {
            Some(Ok(answer)) => Ok(Bytes::copy_from_slice(answer)),
            Some(Err(e)) => Err(e.clone()),
            // File or application not found
            None => Ok(Bytes::from_static(&[0x6A, 0x82])),
        }
    }
}

pub fn success(payload: &[u8]) -> Vec<u8> {
    let mut out = payload.to_vec();
    out.extend_from_slice(&[0x90, 0x00]);
    out
}

/// PPSE answer listing the Visa application
pub fn ppse_fci() -> Vec<u8> {
    let entry = [
        tlv("4f", &hex::decode(VISA_AID).unwrap()),
        tlv("50", b"VISA"),
    ]
    .concat();
    tlv(
        "6f",
        &[
            tlv("84", b"2PAY.SYS.DDF01"),
            tlv("a5", &tlv("bf0c", &tlv("61", &entry))),
        ]
        .concat(),
    )
}

/// Application answer with a label and an optional PDOL
pub fn application_fci(label: &[u8], pdol: Option<&str>) -> Vec<u8> {
    let mut proprietary = tlv("50", label);
    if let Some(pdol) = pdol {
        proprietary.extend(tlv("9f38", &hex::decode(pdol).unwrap()));
    }
    tlv(
        "6f",
        &[
            tlv("84", &hex::decode(VISA_AID).unwrap()),
            tlv("a5", &proprietary),
        ]
        .concat(),
    )
}

/// Format 2 GPO answer carrying `afl`
pub fn gpo_response(afl: &str) -> Vec<u8> {
    tlv(
        "77",
        &[tlv("82", &[0x20, 0x00]), tlv("94", &hex::decode(afl).unwrap())].concat(),
    )
}

/// Record template holding a PAN and expiry date
pub fn pan_record(pan: &str, expiry: &str) -> Vec<u8> {
    tlv(
        "70",
        &[
            tlv("5a", &hex::decode(pan).unwrap()),
            tlv("5f24", &hex::decode(expiry).unwrap()),
        ]
        .concat(),
    )
}

/// Record template without a PAN
pub fn other_record() -> Vec<u8> {
    tlv("70", &[tlv("5f28", &[0x01, 0x12]), tlv("9f07", &[0xFF, 0x00])].concat())
}

/// A Visa card with two files: the first record of the second file holds the PAN
pub fn visa_card() -> ScriptedCard {
    ScriptedCard::new()
        .select(b"2PAY.SYS.DDF01", &ppse_fci())
        .select(
            &hex::decode(VISA_AID).unwrap(),
            &application_fci(b"VISA", Some(CONTACTLESS_PDOL)),
        )
        .gpo(&gpo_response("0801010010010200"))
        .record(1, 0x0C, &other_record())
        .record(1, 0x14, &pan_record("4761739001010010", "251231"))
        .record(2, 0x14, &pan_record("5413330089010434", "301130"))
}

/// Discovery that hands out scripted poll results, then repeats a fallback
#[derive(Debug)]
pub struct ScriptedDiscovery {
    polls: VecDeque<Result<Vec<ScriptedCard>, TransportError>>,
    fallback: fn() -> Result<Vec<ScriptedCard>, TransportError>,
    pub poll_count: usize,
}

impl ScriptedDiscovery {
    pub fn new(
        polls: impl IntoIterator<Item = Result<Vec<ScriptedCard>, TransportError>>,
        fallback: fn() -> Result<Vec<ScriptedCard>, TransportError>,
    ) -> Self {
        Self {
            polls: polls.into_iter().collect(),
            fallback,
            poll_count: 0,
        }
    }
}

impl TargetDiscovery for ScriptedDiscovery {
    type Target = ScriptedCard;

    fn poll_targets(&mut self) -> Result<Vec<ScriptedCard>, TransportError> {
        self.poll_count += 1;
        self.polls.pop_front().unwrap_or_else(self.fallback)
    }
}
