//! End-to-end document assembly tests covering both schema generations.
//!
//! The SPS 2021 message mixes the retired IS/ISR instruction kinds with
//! ordinary, SEPA, foreign, QR-bill and creditor-reference transfers
//! across CHF, EUR, GBP and KWD amounts; the SPS 2022 message carries the
//! generation-agnostic subset.

use payment_initiation::{
    BankCreditTransfer, BankCreditTransferWithCreditorReference, BankCreditTransferWithQrr, Bic,
    CategoryPurposeCode, Currency, CustomerCreditTransfer, FinancialInstitutionAddress,
    ForeignCreditTransfer, GeneralAccount, Iban, Iid, Is1CreditTransfer, Is2CreditTransfer,
    IsrCreditTransfer, IsrParticipant, Money, NotificationInstruction, PaymentError,
    PaymentInformation, PostalAccount, PostalAddress, PurposeCode, Result, SchemaVersion,
    SepaCreditTransfer, SoftwareInfo,
};

fn chf(minor_units: i64) -> Money {
    Money::new(Currency::CHF, minor_units)
}

fn eur(minor_units: i64) -> Money {
    Money::new(Currency::EUR, minor_units)
}

fn gbp(minor_units: i64) -> Money {
    Money::new(Currency::GBP, minor_units)
}

fn kwd(minor_units: i64) -> Money {
    Money::new(Currency::KWD, minor_units)
}

fn address_zurich() -> Result<PostalAddress> {
    PostalAddress::structured(Some("Wiesenweg"), Some("14b"), "8058", "Zürich-Flughafen", "CH")
}

fn unstructured(line1: &str, line2: &str, country: &str) -> Result<PostalAddress> {
    PostalAddress::unstructured(Some(line1), Some(line2), country)
}

fn build_message_sps_2021() -> Result<CustomerCreditTransfer> {
    let mut message =
        CustomerCreditTransfer::new("message-000", "InnoMuster AG", SchemaVersion::Sps2021)?;
    message.set_software(SoftwareInfo {
        name: "softwareName".to_string(),
        version: Some("version".to_string()),
        manufacturer: None,
    });

    // payment-100: IS 2-stage transfers (local instruments CH01 and CH02)
    let mut payment = PaymentInformation::new(
        "payment-100",
        "InnoMuster AG",
        Bic::new("ZKBKCHZZ80A")?,
        Iban::new("CH6600700110000204481")?,
    )?;
    payment.add_transaction(Is1CreditTransfer::new(
        "instr-101",
        "e2e-101",
        chf(30000),
        "Finanzverwaltung Stadt Musterhausen",
        PostalAddress::structured(Some("Altstadt"), Some("1a"), "4998", "Muserhausen", "CH")?,
        PostalAccount::new("80-5928-4")?,
    )?);
    let mut transaction = Is2CreditTransfer::new(
        "instr-102",
        "e2e-102",
        chf(20000),
        "Druckerei Muster GmbH",
        PostalAddress::structured(Some("Gartenstrasse"), Some("61"), "3000", "Bern", "CH")?,
        Iban::new("CH03 0900 0000 3054 1118 8")?,
        "Musterbank AG",
        PostalAccount::new("80-151-4")?,
    )?;
    transaction.set_remittance_information("Test Remittance");
    payment.add_transaction(transaction);
    message.add_payment(payment);

    // payment-110: ISR transfers (local instrument CH03)
    let mut payment = PaymentInformation::new(
        "payment-110",
        "InnoMuster AG",
        Bic::new("POFICHBEXXX")?,
        Iban::new("CH6309000000250097798")?,
    )?;
    payment.add_transaction(IsrCreditTransfer::new(
        "instr-110",
        "e2e-110",
        chf(20000),
        IsrParticipant::new("01-1439-8")?,
        "210000000003139471430009017",
    )?);
    let mut transaction = IsrCreditTransfer::new(
        "instr-111",
        "e2e-111",
        chf(20000),
        IsrParticipant::new("01-95106-8")?,
        "6019701803969733825",
    )?;
    transaction.set_creditor_details(
        "Fritz Bischof",
        PostalAddress::structured(Some("Dorfstrasse"), Some("17"), "9911", "Musterwald", "CH")?,
    )?;
    payment.add_transaction(transaction);
    message.add_payment(payment);

    // payment-120: IS 1-stage transfer with SALA category purpose
    let mut payment = PaymentInformation::new(
        "payment-120",
        "InnoMuster AG",
        Bic::new("POFICHBEXXX")?,
        Iban::new("CH6309000000250097798")?,
    )?;
    payment.set_category_purpose(CategoryPurposeCode::new("SALA")?);
    let mut transaction = Is1CreditTransfer::new(
        "instr-120",
        "e2e-120",
        chf(50000),
        "Meier & Söhne AG",
        PostalAddress::structured(Some("Dorfstrasse"), Some("17"), "9911", "Musterwald", "CH")?,
        PostalAccount::new("60-9-9")?,
    )?;
    transaction.set_remittance_information("Test Remittance");
    payment.add_transaction(transaction);
    message.add_payment(payment);

    add_common_payments(&mut message)?;

    Ok(message)
}

fn build_message_sps_2022() -> Result<CustomerCreditTransfer> {
    let mut message =
        CustomerCreditTransfer::new("message-000", "InnoMuster AG", SchemaVersion::Sps2022)?;
    message.set_software(SoftwareInfo {
        name: "softwareName".to_string(),
        version: Some("version".to_string()),
        manufacturer: Some("manufacturerName".to_string()),
    });
    add_common_payments(&mut message)?;

    Ok(message)
}

/// Payments that are legal under both schema generations.
fn add_common_payments(message: &mut CustomerCreditTransfer) -> Result<()> {
    let sps_2021 = message.version() == SchemaVersion::Sps2021;
    let iban = Iban::new("CH51 0022 5225 9529 1301 C")?;

    // payment-000: ordinary bank transfers, creditor agent by BIC and IID
    let mut payment = PaymentInformation::new(
        "payment-000",
        "InnoMuster AG",
        Bic::new("ZKBKCHZZ80A")?,
        Iban::new("CH6600700110000204481")?,
    )?;
    let mut transaction = BankCreditTransfer::new(
        "instr-000",
        "e2e-000",
        chf(130000),
        "Muster Transport AG",
        Some(address_zurich()?),
        iban.clone(),
        Bic::new("UBSWCHZH80A")?,
    )?;
    transaction.set_remittance_information("Test Remittance");
    payment.add_transaction(transaction);

    let mut transaction = BankCreditTransfer::new(
        "instr-001",
        "e2e-001",
        chf(30000),
        "Muster Transport AG",
        None,
        iban.clone(),
        Iid::from_iban(&iban)?,
    )?;
    transaction.set_remittance_information("Test Remittance");
    transaction.set_purpose(PurposeCode::new("AIRB")?);
    payment.add_transaction(transaction);

    let creditor_name = if sps_2021 {
        "InnoMuster AG"
    } else {
        "New SPS-2022 chars €ȘșȚț"
    };
    let mut transaction = BankCreditTransfer::new(
        "instr-002",
        "e2e-002",
        chf(30000),
        creditor_name,
        None,
        iban.clone(),
        Iid::from_iban(&iban)?,
    )?;
    transaction.set_remittance_information("Test Remittance");
    transaction.set_purpose(PurposeCode::new("AIRB")?);
    payment.add_transaction(transaction);
    message.add_payment(payment);

    // payment-001: bank transfer with SALA category purpose
    let mut payment = PaymentInformation::new(
        "payment-001",
        "InnoMuster AG",
        Bic::new("ZKBKCHZZ80A")?,
        Iban::new("CH6600700110000204481")?,
    )?;
    payment.set_category_purpose(CategoryPurposeCode::new("SALA")?);
    let mut transaction = BankCreditTransfer::new(
        "instr-003",
        "e2e-003",
        chf(130000),
        "Muster Transport AG",
        Some(address_zurich()?),
        iban.clone(),
        Bic::new("UBSWCHZH80A")?,
    )?;
    transaction.set_remittance_information("Test Remittance");
    payment.add_transaction(transaction);
    message.add_payment(payment);

    // payment-010: SEPA and foreign transfers
    let mut payment = PaymentInformation::new(
        "payment-010",
        "InnoMuster AG",
        Bic::new("POFICHBEXXX")?,
        Iban::new("CH6309000000250097798")?,
    )?;
    payment.add_transaction(SepaCreditTransfer::new(
        "instr-010",
        "e2e-010",
        eur(70000),
        "Muster Immo AG",
        Some(unstructured("Musterstraße 35", "80333 München", "DE")?),
        Iban::new("DE89 3704 0044 0532 0130 00")?,
        Bic::new("COBADEFFXXX")?,
    )?);
    payment.add_transaction(ForeignCreditTransfer::new(
        "instr-011",
        "e2e-011",
        gbp(6500),
        "United Development Ltd",
        Some(unstructured("George Street", "BA1 2FJ Bath", "GB")?),
        Iban::new("GB29 NWBK 6016 1331 9268 19")?,
        Bic::new("NWBKGB2L")?,
    )?);
    payment.add_transaction(ForeignCreditTransfer::new(
        "instr-012",
        "e2e-012",
        kwd(300001),
        "United Development Kuwait",
        Some(unstructured("P.O. Box 23954 Safat", "13100 Kuwait", "KW")?),
        Iban::new("BR97 0036 0305 0000 1000 9795 493P 1")?,
        FinancialInstitutionAddress::new(
            "Caixa Economica Federal",
            unstructured("Rua Sao Valentim, 620", "03446-040 Sao Paulo-SP", "BR")?,
        )?,
    )?);
    let mut transaction = ForeignCreditTransfer::new(
        "instr-013",
        "e2e-013",
        gbp(4500),
        "United Development Belgium SA/NV",
        Some(unstructured("Oostjachtpark 187", "6743 Buzenol", "BE")?),
        GeneralAccount::new("123-4567890-78")?,
        FinancialInstitutionAddress::new(
            "Belfius Bank",
            unstructured("Pachecolaan 44", "1000 Brussel", "BE")?,
        )?,
    )?;
    transaction.set_intermediary_agent(Bic::new("SWHQBEBB")?);
    payment.add_transaction(transaction);
    message.add_payment(payment);

    // payment-020: SEPA transfer in a SEPA-flavored batch
    let mut payment = PaymentInformation::sepa(
        "payment-020",
        "InnoMuster AG",
        Bic::new("POFICHBEXXX")?,
        Iban::new("CH6309000000250097798")?,
    )?;
    payment.add_transaction(SepaCreditTransfer::new(
        "instr-020",
        "e2e-020",
        eur(10000),
        "Bau Muster AG",
        Some(unstructured("Musterallee 11", "10115 Berlin", "DE")?),
        Iban::new("DE22 2665 0001 9311 6826 12")?,
        Bic::new("NOLADE21EMS")?,
    )?);
    message.add_payment(payment);

    // payment-030: QR-bill and creditor-reference transfers
    let mut payment = PaymentInformation::new(
        "payment-030",
        "InnoMuster AG",
        Bic::new("ZKBKCHZZ80A")?,
        Iban::new("CH6600700110000204481")?,
    )?;
    let qr_iban = Iban::new("CH44 3199 9123 0008 8901 2")?;
    let mut transaction = BankCreditTransferWithQrr::new(
        "instr-030",
        "e2e-030",
        chf(130000),
        "Muster Transport AG",
        Some(address_zurich()?),
        qr_iban.clone(),
        Iid::from_iban(&qr_iban)?,
        "210000000003139471430009017",
    )?;
    transaction.set_remittance_information("Test Remittance");
    payment.add_transaction(transaction);
    let mut transaction = BankCreditTransferWithCreditorReference::new(
        "instr-031",
        "e2e-031",
        chf(130000),
        "Muster Transport AG",
        Some(address_zurich()?),
        iban.clone(),
        Iid::from_iban(&iban)?,
        "RF 72 0191 2301 0040 5JSH 0438",
    )?;
    transaction.set_remittance_information("Test Remittance");
    payment.add_transaction(transaction);
    message.add_payment(payment);

    Ok(())
}

fn sample_is1_transfer() -> Result<Is1CreditTransfer> {
    Is1CreditTransfer::new(
        "instr-101",
        "e2e-101",
        chf(30000),
        "Finanzverwaltung Stadt Musterhausen",
        PostalAddress::structured(Some("Altstadt"), Some("1a"), "4998", "Muserhausen", "CH")?,
        PostalAccount::new("80-5928-4")?,
    )
}

#[test]
fn test_group_header_sps_2021() {
    let message = build_message_sps_2021().unwrap();
    assert_eq!(message.payment_count(), 8);

    let xml = message.as_xml().unwrap();
    assert!(xml.contains("<NbOfTxs>16</NbOfTxs>"));
    assert!(xml.contains("<CtrlSum>8410.001</CtrlSum>"));
    assert!(xml.contains("<MsgId>message-000</MsgId>"));
}

#[test]
fn test_group_header_sps_2022() {
    let message = build_message_sps_2022().unwrap();
    assert_eq!(message.payment_count(), 5);

    let xml = message.as_xml().unwrap();
    assert!(xml.contains("<NbOfTxs>11</NbOfTxs>"));
    assert!(xml.contains("<CtrlSum>7010.001</CtrlSum>"));
}

#[test]
fn test_document_attributes() {
    let xml = build_message_sps_2021().unwrap().as_xml().unwrap();
    assert!(xml.contains(
        "xmlns=\"http://www.six-interbank-clearing.com/de/pain.001.001.03.ch.02.xsd\""
    ));
    assert!(xml.contains(
        "xsi:schemaLocation=\"http://www.six-interbank-clearing.com/de/pain.001.001.03.ch.02.xsd \
         pain.001.001.03.ch.02.xsd\""
    ));

    let xml = build_message_sps_2022().unwrap().as_xml().unwrap();
    assert!(xml.contains("xmlns=\"urn:iso:std:iso:20022:tech:xsd:pain.001.001.09\""));
    assert!(xml.contains(
        "xsi:schemaLocation=\"urn:iso:std:iso:20022:tech:xsd:pain.001.001.09 \
         pain.001.001.09.ch.03.xsd\""
    ));
}

#[test]
fn test_institution_element_names_follow_version() {
    let xml = build_message_sps_2021().unwrap().as_xml().unwrap();
    assert!(xml.contains("<BIC>ZKBKCHZZ80A</BIC>"));
    assert!(!xml.contains("<BICFI>"));

    let xml = build_message_sps_2022().unwrap().as_xml().unwrap();
    assert!(xml.contains("<BICFI>ZKBKCHZZ80A</BICFI>"));
    assert!(!xml.contains("<BIC>"));
}

#[test]
fn test_local_instruments_rendered_under_sps_2021() {
    let xml = build_message_sps_2021().unwrap().as_xml().unwrap();
    for proprietary in ["CH01", "CH02", "CH03"] {
        assert!(
            xml.contains(&format!("<LclInstrm><Prtry>{}</Prtry></LclInstrm>", proprietary)),
            "missing local instrument {}",
            proprietary
        );
    }
    assert!(xml.contains("<Prtry>QRR</Prtry>"));
    assert!(xml.contains("<Cd>SCOR</Cd>"));
    assert!(xml.contains("<Ref>RF720191230100405JSH0438</Ref>"));
}

#[test]
fn test_is1_rejected_under_sps_2022() {
    let mut message = build_message_sps_2022().unwrap();
    let mut payment = PaymentInformation::new(
        "payment-100",
        "InnoMuster AG",
        Bic::new("ZKBKCHZZ80A").unwrap(),
        Iban::new("CH6600700110000204481").unwrap(),
    )
    .unwrap();
    payment.add_transaction(sample_is1_transfer().unwrap());
    message.add_payment(payment);

    let err = message.as_xml().unwrap_err();
    assert!(matches!(err, PaymentError::SchemaVersion(_)));
    assert!(err
        .to_string()
        .contains("IS 2-stage payments can only be created until SPS 2021 version"));
}

#[test]
fn test_is2_rejected_under_sps_2022() {
    let mut message = build_message_sps_2022().unwrap();
    let mut payment = PaymentInformation::new(
        "payment-100",
        "InnoMuster AG",
        Bic::new("ZKBKCHZZ80A").unwrap(),
        Iban::new("CH6600700110000204481").unwrap(),
    )
    .unwrap();
    let mut transaction = Is2CreditTransfer::new(
        "instr-102",
        "e2e-102",
        chf(20000),
        "Druckerei Muster GmbH",
        PostalAddress::structured(Some("Gartenstrasse"), Some("61"), "3000", "Bern", "CH").unwrap(),
        Iban::new("CH03 0900 0000 3054 1118 8").unwrap(),
        "Musterbank AG",
        PostalAccount::new("80-151-4").unwrap(),
    )
    .unwrap();
    transaction.set_remittance_information("Test Remittance");
    payment.add_transaction(transaction);
    message.add_payment(payment);

    let err = message.as_xml().unwrap_err();
    assert!(err
        .to_string()
        .contains("IS 2-stage payments can only be created until SPS 2021 version"));
}

#[test]
fn test_isr_rejected_under_sps_2022() {
    let mut message = build_message_sps_2022().unwrap();
    let mut payment = PaymentInformation::new(
        "payment-100",
        "InnoMuster AG",
        Bic::new("ZKBKCHZZ80A").unwrap(),
        Iban::new("CH6600700110000204481").unwrap(),
    )
    .unwrap();
    payment.add_transaction(
        IsrCreditTransfer::new(
            "instr-110",
            "e2e-110",
            chf(20000),
            IsrParticipant::new("01-1439-8").unwrap(),
            "210000000003139471430009017",
        )
        .unwrap(),
    );
    message.add_payment(payment);

    let err = message.as_xml().unwrap_err();
    assert!(matches!(err, PaymentError::SchemaVersion(_)));
    assert!(err
        .to_string()
        .contains("ISR payments can only be created until SPS 2021 version"));
}

#[test]
fn test_notification_instruction_against_batch_booking() {
    let mut message = build_message_sps_2021().unwrap();
    let mut payment = PaymentInformation::new(
        "payment-200",
        "InnoMuster AG",
        Bic::new("ZKBKCHZZ80A").unwrap(),
        Iban::new("CH6600700110000204481").unwrap(),
    )
    .unwrap();
    payment.set_notification_instruction(NotificationInstruction::CollectiveWithDetails);
    payment.set_batch_booking(false);
    message.add_payment(payment.clone());

    let err = message.as_xml().unwrap_err();
    assert!(matches!(err, PaymentError::BusinessRule(_)));

    // the same instruction is fine with batch booking enabled
    let mut message = build_message_sps_2021().unwrap();
    payment.set_batch_booking(true);
    message.add_payment(payment);
    assert!(message.as_xml().is_ok());
}
