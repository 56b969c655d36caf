use geoextract_dawa::transform::{AccessAddress, Road, access_address, road};

fn main() {
    divan::main();
}

fn access_address_lines(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| {
            format!(
                r#"{{"id":"0a3f5081-c35e-32b8-e044-{i:012}","status":1,"oprettet":"2000-02-05T20:25:56.000","ændret":"2018-07-04T18:00:00.000","kommunekode":"0101","vejkode":"0512","navngivenvej_id":"e0a3c29b-0c1d-4f6e-9d5c-2ef1f1f7b1d2","husnr":"{}","postnr":"1620","supplerendebynavn":null,"matrikelnr":"123ab","etrs89koordinat_øst":{}.64,"etrs89koordinat_nord":6175370.1,"adressepunktændringsdato":"2002-04-08T00:00:00.000"}}"#,
                i % 200 + 1,
                720_000 + i % 5_000
            )
        })
        .collect()
}

fn road_lines(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| {
            format!(
                r#"{{"id":"e0a3c29b-0c1d-4f6e-9d5c-{i:012}","darstatus":3,"navn":"Vesterbrogade","adresseringsnavn":"Vesterbrogade","administreresafkommune":"0101","beliggenhed_vejnavnelinje":{{"type":"MultiLineString","coordinates":[[[723000.1,6175000.2],[723100.5,6175050.0],[723180.9,6175101.7]]]}}}}"#
            )
        })
        .collect()
}

#[divan::bench]
fn decode_access_address(bencher: divan::Bencher) {
    let lines = access_address_lines(10_000);
    bencher.bench(|| {
        for line in &lines {
            let _: AccessAddress = sonic_rs::from_str(line).unwrap();
        }
    });
}

#[divan::bench]
fn decode_map_serialize_access_address(bencher: divan::Bencher) {
    let lines = access_address_lines(10_000);
    let mut buf = Vec::with_capacity(1024);
    bencher.bench_local(|| {
        for line in &lines {
            let record: AccessAddress = sonic_rs::from_str(line).unwrap();
            let feature = access_address::map(record).unwrap();
            buf.clear();
            feature.write_line(&mut buf).unwrap();
        }
    });
}

#[divan::bench]
fn decode_map_serialize_road(bencher: divan::Bencher) {
    let lines = road_lines(10_000);
    let mut buf = Vec::with_capacity(1024);
    bencher.bench_local(|| {
        for line in &lines {
            let record: Road = sonic_rs::from_str(line).unwrap();
            let feature = road::map(record).unwrap();
            buf.clear();
            feature.write_line(&mut buf).unwrap();
        }
    });
}
