use apple_png::{png::PngRawChunkIter, ApplePng};

/// Converts each Apple PNG given on the command line, writing `<name>.std.png`
/// next to it.
fn main() {
  let args: Vec<String> = std::env::args().collect();
  println!("ARGS: {args:?}");
  for file_arg in args[1..].iter() {
    let path = std::path::Path::new(file_arg);
    print!("Reading `{}`... ", path.display());
    let bytes = match std::fs::read(path) {
      Ok(bytes) => {
        println!("got {} bytes.", bytes.len());
        bytes
      }
      Err(e) => {
        println!("{e:?}");
        continue;
      }
    };
    for (n, raw_chunk) in PngRawChunkIter::new(&bytes).enumerate() {
      println!("{n}: {raw_chunk:?}");
    }
    let mut png = match ApplePng::new(bytes) {
      Ok(png) => png,
      Err(e) => {
        println!("{e}");
        continue;
      }
    };
    println!("{}x{}", png.width(), png.height());
    match png.data() {
      Ok(data) => {
        let out = path.with_extension("std.png");
        match std::fs::write(&out, data) {
          Ok(()) => println!("wrote `{}`", out.display()),
          Err(e) => println!("{e:?}"),
        }
      }
      Err(e) => println!("{e}"),
    }
  }
}
