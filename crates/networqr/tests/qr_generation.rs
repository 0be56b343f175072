use networqr::{
    build_transfer_params, ChannelEncoder, ChannelKind, ContactRecord, PhonePolicy, QrBoard,
    QrPngEncoder, RenderOptions, TransferParams,
};

fn jane(phone: Option<&str>) -> ContactRecord {
    ContactRecord::new(
        "Jane Doe",
        "https://linkedin.com/in/janedoe",
        phone.map(str::to_string),
    )
    .expect("valid record")
}

#[tokio::test]
async fn shared_link_produces_both_codes() {
    let link = build_transfer_params(&jane(Some("+1 555 123 4567"))).link("/my-qr");
    assert_eq!(
        link,
        "/my-qr?name=Jane+Doe&linkedin=https%3A%2F%2Flinkedin.com%2Fin%2Fjanedoe&phone=%2B1+555+123+4567"
    );

    let record = TransferParams::parse(&link).to_contact().expect("contact");
    let channels = ChannelEncoder::default()
        .encode_channels(&record)
        .collect()
        .await;

    let summary: Vec<_> = channels
        .iter()
        .map(|c| (c.label.as_str(), c.display.as_str(), c.payload.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (
                "LinkedIn Profile",
                "https://linkedin.com/in/janedoe",
                "https://linkedin.com/in/janedoe"
            ),
            ("Phone Number", "+1 555 123 4567", "tel:+15551234567"),
        ]
    );

    for channel in &channels {
        let image = channel.image.image().expect("image generated");
        assert_eq!(image.width(), 280);
        assert!(image.to_data_url().starts_with("data:image/png;base64,"));
    }
}

#[tokio::test]
async fn link_without_phone_produces_profile_only() {
    let record = TransferParams::parse("?name=Jane+Doe&linkedin=https%3A%2F%2Flinkedin.com%2Fin%2Fjanedoe")
        .to_contact()
        .expect("contact");

    let channels = ChannelEncoder::default()
        .encode_channels(&record)
        .collect()
        .await;
    assert_eq!(channels.len(), 1);
    assert_eq!(channels[0].kind, ChannelKind::Profile);
}

#[test]
fn link_without_linkedin_is_rejected() {
    let err = TransferParams::parse("/my-qr?name=Jane+Doe")
        .to_contact()
        .unwrap_err();
    assert!(err.is_missing_field());
}

#[tokio::test]
async fn board_reload_discards_late_results() {
    let encoder = ChannelEncoder::new(
        QrPngEncoder::new(),
        RenderOptions {
            width: 120,
            ..RenderOptions::default()
        },
        PhonePolicy::default(),
    );
    let mut board = QrBoard::new();

    let first = encoder
        .encode_board(&mut board, jane(Some("+1 555 123 4567")))
        .collect()
        .await;
    assert_eq!(first.len(), 2);

    let mut old = encoder.encode_board(&mut board, jane(Some("+1 555 123 4567")));
    let mut new = encoder.encode_board(&mut board, jane(Some("N/A")));

    while let Some(update) = old.next().await {
        assert!(!board.apply(update));
    }
    assert!(!board.is_settled());

    while let Some(update) = new.next().await {
        assert!(board.apply(update));
    }
    assert!(board.is_settled());
    assert_eq!(board.channels().len(), 1);
    assert_eq!(
        board.channels()[0].image.image().map(|i| i.width()),
        Some(120)
    );
}

#[tokio::test]
async fn degenerate_phone_follows_policy() {
    let record = jane(Some("N/A"));

    let skipped = ChannelEncoder::default()
        .encode_channels(&record)
        .collect()
        .await;
    assert_eq!(skipped.len(), 1);

    let encoded = ChannelEncoder::new(
        QrPngEncoder::new(),
        RenderOptions::default(),
        PhonePolicy::EncodeDegenerate,
    )
    .encode_channels(&record)
    .collect()
    .await;
    assert_eq!(encoded.len(), 2);
    assert_eq!(encoded[1].payload, "tel:+");
    assert_eq!(encoded[1].display, "N/A");
}
