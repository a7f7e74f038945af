use terminal_core::{ChartPoint, ChartSeries, PriceCandle, TimeFrame};

/// Build a chart from exchange candles: the last N by time, oldest first
pub fn build_chart_series(mut candles: Vec<PriceCandle>, timeframe: TimeFrame) -> ChartSeries {
    candles.sort_by_key(|c| c.timestamp);

    let skip = candles.len().saturating_sub(timeframe.point_count());
    let points = candles
        .into_iter()
        .skip(skip)
        .map(|c| ChartPoint {
            label: timeframe.label(c.timestamp),
            price: c.close,
            timestamp: c.timestamp,
        })
        .collect();

    ChartSeries { timeframe, points }
}
