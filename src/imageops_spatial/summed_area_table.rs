use crate::error::Error;
use crate::utils::validate_non_empty_image;
use image::GrayImage;

/// 積分画像（Summed-Area Table）
///
/// 原点 (0,0) から (x,y) までの矩形領域の画素値の累積和を保持し、
/// 任意の矩形領域の合計を定数時間で求めます。
/// 大きな画像でも桁あふれしないよう `u64` で累積します。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummedAreaTable {
    data: Vec<u64>,
    width: u32,
    height: u32,
}

/// 画像から積分画像を作成する機能を提供するトレイト
pub trait CreateSummedAreaTable {
    /// 画像から積分画像を作成します
    ///
    /// # Errors
    ///
    /// * `Error::EmptyImage` - 画像の幅または高さが 0 の場合
    fn create_summed_area_table(&self) -> Result<SummedAreaTable, Error>;
}

impl CreateSummedAreaTable for GrayImage {
    fn create_summed_area_table(&self) -> Result<SummedAreaTable, Error> {
        let (width, height) = self.dimensions();
        validate_non_empty_image(width, height)?;
        Ok(SummedAreaTable::from_data(self.as_raw(), width, height))
    }
}

impl SummedAreaTable {
    /// 単一チャンネルのデータ（行優先順序）から積分画像を作成します
    ///
    /// `data` の長さは `width * height` 以上である必要があります。
    pub fn from_data(data: &[u8], width: u32, height: u32) -> Self {
        let w = width as usize;
        let mut sat = vec![0u64; w * height as usize];
        if w == 0 {
            return Self {
                data: sat,
                width,
                height,
            };
        }

        for (y, row) in data.chunks_exact(w).take(height as usize).enumerate() {
            // 行ごとの累積和に上の行の値を加算する
            let mut row_sum = 0u64;
            for (x, &value) in row.iter().enumerate() {
                row_sum += u64::from(value);
                let above = if y > 0 { sat[(y - 1) * w + x] } else { 0 };
                sat[y * w + x] = row_sum + above;
            }
        }

        Self {
            data: sat,
            width,
            height,
        }
    }

    /// 指定された座標での積分画像の値、範囲外の場合は 0
    #[must_use]
    pub fn get(&self, x: i64, y: i64) -> u64 {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            0
        } else {
            self.data[y as usize * self.width as usize + x as usize]
        }
    }

    /// 矩形 `[x1, x2] x [y1, y2]`（両端を含む）を画像内に切り詰め、その合計と画素数を返します
    ///
    /// 切り詰めた結果が空の場合は `(0, 0)` です。
    ///
    /// Sum = sat(x2, y2) - sat(x1-1, y2) - sat(x2, y1-1) + sat(x1-1, y1-1)
    #[must_use]
    pub fn rectangle_sum(&self, x1: i64, y1: i64, x2: i64, y2: i64) -> (u64, u64) {
        let x1 = x1.max(0);
        let y1 = y1.max(0);
        let x2 = x2.min(i64::from(self.width) - 1);
        let y2 = y2.min(i64::from(self.height) - 1);

        if x1 > x2 || y1 > y2 {
            return (0, 0);
        }

        let sum = self.get(x2, y2) + self.get(x1 - 1, y1 - 1)
            - self.get(x2, y1 - 1)
            - self.get(x1 - 1, y2);
        let count = ((x2 - x1 + 1) * (y2 - y1 + 1)) as u64;
        (sum, count)
    }

    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }
}
