/*!

This is the long-form manual for `area_tally` and `touchtally`.

## How the areas are counted

Every respondent touched the reference image up to four times: two touches for
what they like (`like1`, `like2`) and two touches for what they dislike
(`dislike1`, `dislike2`). Each touch is attributed to the first region that
contains it, in the order in which the regions are defined. A touch exactly on
the border of a region is not inside that region. Touches outside of every
region are not counted.

Two tables are computed:
- *before*: all the touches are counted.
- *after*: when a respondent touched the same region with both a like and a
  dislike, none of these touches count. There is no netting: two likes and one
  dislike in the same region count for nothing.

The `none` column is the number of respondents minus the likes and the dislikes.
In the *before* table, a respondent can count twice in the same region, so that
this column can become negative. This is reported as is.

## Input formats

The following formats are supported:
* `csv` Comma Separated Values, with a header row
* `xlsx` Excel spreadsheet, with a header row

### Regions

One row per boundary point. The rows of a region are grouped by name, the first
appearance of a name sets the order of the region.

```text
name,x,y
door,10,10
door,60,10
door,60,90
door,10,90
window,100,20
window,180,20
window,180,70
window,100,70
```

A region needs at least 3 points. The polygon does not need to repeat its
first point.

### Responses

One row per respondent.

```text
Respondent ID,like1_x,like1_y,like2_x,like2_y,dislike1_x,dislike1_y,dislike2_x,dislike2_y
r1,30,50,,,150,40,,
r2,120,30,40,20,,,,
```

The `Respondent ID` column is optional (the name can be changed in the
configuration). When it is missing, the position of the row (starting at 0) is
used. Empty cells, `NA`, `N/A`, `NaN`, `nan` and `null` are missing values. A
touch with only one of its two coordinates is ignored.

## Configuration

`touchtally` can be run with command line flags only, or with a configuration
file in JSON:

```json
{
  "outputSettings": {
    "surveyName": "Entrance hall",
    "outputDirectory": "out",
    "markerRadius": 10,
    "writeCsvTables": true
  },
  "regionSource": {
    "provider": "csv",
    "filePath": "area.csv"
  },
  "responseSource": {
    "provider": "xlsx",
    "filePath": "response.xlsx",
    "idColumn": "Respondent ID",
    "excelWorksheetName": "Sheet1"
  },
  "backgroundImage": "hall.png"
}
```

The paths are relative to the directory of the configuration file.

`regionSource` (or `--regions`) can be left out when an output directory and a
background image are given. Nothing is tallied then: every touch is drawn on
the image (`all_overlay.png`) and the summary only lists the touches.

## Outputs

The summary is written in JSON. If an output directory is given, the tables are
also written as CSV files (`before.csv`, `after.csv`, `diff.csv`,
`filtered_coordinates.csv`, `all_coordinates.csv`), along with
`after_scatter.png`, a scatter plot of the areas at their (like, dislike) counts
after cancellation. If a background image is
given as well, two copies of it are saved with the touches drawn in red (like)
and blue (dislike): `after_overlay.png` with the touches kept after
cancellation, `all_overlay.png` with every touch.

 */
