#![allow(dead_code)]

use std::fs;
use std::path::Path;

pub const VOC_TWO_OBJECTS: &str = r#"<annotation>
    <folder>cr</folder>
    <filename>crazing_1.jpg</filename>
    <source>
        <database>NEU-DET</database>
    </source>
    <size>
        <width>200</width>
        <height>200</height>
        <depth>1</depth>
    </size>
    <segmented>0</segmented>
    <object>
        <name>crazing</name>
        <pose>Unspecified</pose>
        <truncated>0</truncated>
        <difficult>0</difficult>
        <bndbox>
            <xmin>50</xmin>
            <ymin>50</ymin>
            <xmax>150</xmax>
            <ymax>150</ymax>
        </bndbox>
    </object>
    <object>
        <name>scratches</name>
        <pose>Unspecified</pose>
        <truncated>0</truncated>
        <difficult>0</difficult>
        <bndbox>
            <xmin>0</xmin>
            <ymin>0</ymin>
            <xmax>100</xmax>
            <ymax>50</ymax>
        </bndbox>
    </object>
</annotation>
"#;

/// A one-object annotation whose `<size>` block is written the way some
/// exporters do it: real-valued width, empty depth.
pub const VOC_LOOSE_SIZE: &str = r#"<annotation>
    <filename>loose.jpg</filename>
    <size>
        <width>200.0</width>
        <height>200</height>
        <depth></depth>
    </size>
    <object>
        <name>inclusion</name>
        <bndbox>
            <xmin>50</xmin>
            <ymin>50</ymin>
            <xmax>150</xmax>
            <ymax>150</ymax>
        </bndbox>
    </object>
</annotation>
"#;

/// Smallest PNG prefix whose header reports the given size
pub fn png_header(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.extend_from_slice(&13u32.to_be_bytes());
    bytes.extend_from_slice(b"IHDR");
    bytes.extend_from_slice(&width.to_be_bytes());
    bytes.extend_from_slice(&height.to_be_bytes());
    bytes.extend_from_slice(&[8, 2, 0, 0, 0]);
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    bytes
}

pub fn write_file(path: &Path, contents: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

/// VOC document with one `<object>` per `(name, xmin, ymin, xmax, ymax)`
pub fn voc_xml(filename: &str, size: (u32, u32), objects: &[(&str, f64, f64, f64, f64)]) -> String {
    let mut xml = format!(
        "<annotation>\n  <filename>{}</filename>\n  <size><width>{}</width><height>{}</height><depth>3</depth></size>\n",
        filename, size.0, size.1
    );
    for (name, xmin, ymin, xmax, ymax) in objects {
        xml.push_str(&format!(
            "  <object>\n    <name>{}</name>\n    <difficult>0</difficult>\n    <bndbox><xmin>{}</xmin><ymin>{}</ymin><xmax>{}</xmax><ymax>{}</ymax></bndbox>\n  </object>\n",
            name, xmin, ymin, xmax, ymax
        ));
    }
    xml.push_str("</annotation>\n");
    xml
}

/// Lay out a small VOC dataset:
///
/// - `a.jpg` (200x200): crazing + scratches
/// - `b.png` (400x200): patches + an unknown class
/// - `c`: annotation but no image
/// - `d.bmp`: image but no annotation
/// - `e.jpg`: only an unknown class
///
/// `train` lists all five, `val` lists `a` and `b`.
pub fn build_voc_dataset(root: &Path) {
    let images = root.join("JPEGImages");
    let annotations = root.join("Annotations");
    let manifests = root.join("ImageSets").join("Main");

    write_file(&images.join("a.jpg"), &png_header(200, 200));
    write_file(
        &annotations.join("a.xml"),
        voc_xml(
            "a.jpg",
            (200, 200),
            &[
                ("crazing", 50.0, 50.0, 150.0, 150.0),
                ("scratches", 0.0, 0.0, 100.0, 50.0),
            ],
        )
        .as_bytes(),
    );

    write_file(&images.join("b.png"), &png_header(400, 200));
    write_file(
        &annotations.join("b.xml"),
        voc_xml(
            "b.png",
            (400, 200),
            &[
                ("rust", 1.0, 1.0, 5.0, 5.0),
                ("patches", 100.0, 20.0, 300.0, 180.0),
            ],
        )
        .as_bytes(),
    );

    write_file(
        &annotations.join("c.xml"),
        voc_xml("c.jpg", (200, 200), &[("crazing", 1.0, 1.0, 2.0, 2.0)]).as_bytes(),
    );

    write_file(&images.join("d.bmp"), &png_header(200, 200));

    write_file(&images.join("e.jpg"), &png_header(200, 200));
    write_file(
        &annotations.join("e.xml"),
        voc_xml("e.jpg", (200, 200), &[("rust", 1.0, 1.0, 2.0, 2.0)]).as_bytes(),
    );

    write_file(&manifests.join("train.txt"), b"a\nb\n\nc\nd\ne\n");
    write_file(&manifests.join("val.txt"), b"a\nb\n");
}
