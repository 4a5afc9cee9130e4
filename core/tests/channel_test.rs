mod common;

use std::convert::TryFrom;
use std::time::{Duration, Instant};

use common::*;
use ed25519_dalek::{Signature, Verifier};
use ledger_admin::{create_channel, ChannelOutcome, DevNetwork, NetworkClient};
use serial_test::serial;

#[test]
#[serial]
fn every_organization_and_the_orderer_sign_twice() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let network = NetworkBuilder::new().with_grace_period(200).build();
        let dev = DevNetwork::new();
        let session = open_session(&network.settings, &dev).await;
        let start = Instant::now();
        let outcome = create_channel(&session, "mychannel").await;
        assert_eq!(outcome, ChannelOutcome::Created);
        assert!(start.elapsed() >= Duration::from_millis(200));
        assert_eq!(dev.sign_calls(), vec!["Org1MSP", "Org2MSP", "OrdererMSP"]);

        let submissions = dev.channel_submissions();
        assert_eq!(submissions.len(), 1);
        let request = &submissions[0];
        assert_eq!(request.name, "mychannel");
        assert_eq!(request.config, CONFIG_UPDATE);
        let signers: Vec<&str> = request
            .signatures
            .iter()
            .map(|signature| signature.signer.as_str())
            .collect();
        assert_eq!(
            signers,
            vec!["Org1MSP", "Org1MSP", "Org2MSP", "Org2MSP", "OrdererMSP", "OrdererMSP"]
        );
        assert_eq!(request.orderer, *session.orderer());
        assert_eq!(dev.channels(), vec!["mychannel".to_string()]);
        session.close().await;
    });
}

#[test]
fn organizations_sign_in_numeric_order() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let network = NetworkBuilder::new().with_organizations(10).build();
        let dev = DevNetwork::new();
        let session = open_session(&network.settings, &dev).await;
        assert_eq!(
            create_channel(&session, "mychannel").await,
            ChannelOutcome::Created
        );
        let mut expected: Vec<String> = (1..=10).map(|index| format!("Org{}MSP", index)).collect();
        expected.push("OrdererMSP".into());
        assert_eq!(dev.sign_calls(), expected);
        assert_eq!(dev.channel_submissions()[0].signatures.len(), 22);
        session.close().await;
    });
}

#[test]
fn signatures_are_made_with_each_admin_key() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let network = NetworkBuilder::new().build();
        let dev = DevNetwork::new();
        let session = open_session(&network.settings, &dev).await;
        assert_eq!(
            create_channel(&session, "mychannel").await,
            ChannelOutcome::Created
        );
        let request = dev.channel_submissions().remove(0);
        let org1 = session
            .resolve_admin(session.topology().organization("org1").unwrap())
            .await
            .unwrap();
        let orderer = session.resolve_orderer_admin().await.unwrap();
        let check = |index: usize, public: ed25519_dalek::PublicKey| {
            let signature = &request.signatures[index];
            let mut message = signature.signature_header.clone();
            message.extend_from_slice(&request.config);
            let parsed = Signature::try_from(signature.signature.as_slice()).unwrap();
            public.verify(&message, &parsed).is_ok()
        };
        assert!(check(0, DevNetwork::public_key(&org1).unwrap()));
        assert!(!check(2, DevNetwork::public_key(&org1).unwrap()));
        assert!(check(4, DevNetwork::public_key(&orderer).unwrap()));
        session.close().await;
    });
}

#[test]
fn duplicate_channel_is_rejected_without_retry() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let network = NetworkBuilder::new().build();
        let dev = DevNetwork::new();
        let session = open_session(&network.settings, &dev).await;
        assert_eq!(
            create_channel(&session, "mychannel").await,
            ChannelOutcome::Created
        );
        let outcome = create_channel(&session, "mychannel").await;
        match outcome {
            ChannelOutcome::Rejected { status, info } => {
                assert_eq!(status, "BAD_REQUEST");
                assert!(info.contains("mychannel"));
            }
            other => panic!("Unexpected outcome {:?}", other),
        }
        assert_eq!(dev.channel_submissions().len(), 2);
        session.close().await;
    });
}

#[test]
fn rejected_creation_skips_the_grace_period() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let network = NetworkBuilder::new().with_grace_period(2000).build();
        let dev = DevNetwork::new();
        dev.existing_channel("mychannel");
        let session = open_session(&network.settings, &dev).await;
        let start = Instant::now();
        let outcome = create_channel(&session, "mychannel").await;
        assert!(start.elapsed() < Duration::from_millis(1000));
        assert!(matches!(outcome, ChannelOutcome::Rejected { .. }));
        assert_eq!(dev.channel_submissions().len(), 1);
        session.close().await;
    });
}

#[test]
fn missing_admin_material_stops_the_chain() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let network = NetworkBuilder::new().without_admin("org2").build();
        let dev = DevNetwork::new();
        let session = open_session(&network.settings, &dev).await;
        let outcome = create_channel(&session, "mychannel").await;
        match outcome {
            ChannelOutcome::Failed(reason) => {
                assert!(reason.starts_with("Failed to get user context for org2"));
                assert!(reason.contains("could not be read"));
            }
            other => panic!("Unexpected outcome {:?}", other),
        }
        // org1 signed before the chain stopped, the orderer admin never did
        assert_eq!(dev.sign_calls(), vec!["Org1MSP"]);
        assert!(dev.channel_submissions().is_empty());
        session.close().await;
    });
}

#[test]
fn unreadable_configuration_is_reported() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let network = NetworkBuilder::new().build();
        std::fs::write(network.path().join("channel.tx"), b"not an envelope").unwrap();
        let dev = DevNetwork::new();
        let session = open_session(&network.settings, &dev).await;
        let outcome = create_channel(&session, "mychannel").await;
        assert!(matches!(outcome, ChannelOutcome::Failed(_)));
        assert!(dev.sign_calls().is_empty());
        assert!(dev
            .decode_envelope(&DevNetwork::encode_envelope(CONFIG_UPDATE))
            .is_ok());
        session.close().await;
    });
}
